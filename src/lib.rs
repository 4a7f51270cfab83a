//! # Dynamic Graph Exceptions
//!
//! Category-coded exception values for a dataflow-graph robot control
//! framework.
//!
//! Every exception carries two things a handler needs:
//!
//! 1. **An error code** - a small integer drawn from a per-category range
//!    (`Factory` codes live in 400-499, `Signal` codes in 100-199, ...)
//! 2. **A message** - human-readable text assembled once, at construction,
//!    and frozen afterwards
//!
//! A category name (`"Factory"`, `"Signal"`, ...) is available both from a
//! value ([`Exception::exception_name`]) and without one (the associated
//! `EXCEPTION_NAME` constant on each type).
//!
//! ## Quick Start
//!
//! ```rust
//! use dynamic_graph_exceptions::{factory_err, Exception, FactoryError, FactoryErrorCode};
//!
//! fn lookup(name: &str) -> Result<(), FactoryError> {
//!     Err(factory_err!(
//!         FactoryErrorCode::UnreferedObject,
//!         "unknown entity: ",
//!         "<{}>",
//!         name
//!     ))
//! }
//!
//! let err = lookup("robot_device").unwrap_err();
//! assert_eq!(err.code_value(), 401);
//! assert_eq!(err.message(), "unknown entity: <robot_device>");
//! assert_eq!(FactoryError::EXCEPTION_NAME, "Factory");
//! ```
//!
//! ## Formatted details
//!
//! The second construction form renders a type-checked format string into a
//! 256-byte buffer and appends it to the base message. Output longer than
//! 255 bytes is cut silently on a character boundary; see
//! [`convenience::render_bounded`].
//!
//! ## Tracing
//!
//! [`FactoryError`] reports its own construction through the leveled trace
//! hook in [`logging`]. By default records go to the `tracing` crate; a
//! [`TraceBuffer`] can capture them in memory instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::result;

pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod logging;
pub mod models;
pub mod ring_buffer;

pub use codes::*;
pub use convenience::*;
pub use definitions::*;
pub use logging::*;
pub use models::*;
pub use ring_buffer::*;

/// Type alias for Results using the framework-wide error union.
pub type Result<T> = result::Result<T, DynamicGraphError>;

// ============================================================================
// Exception Base
// ============================================================================

/// State shared by every exception category.
///
/// The base owns the code and the message. The message may only be extended
/// by the concrete exception types while they are being built; once a value
/// leaves its constructor nothing can mutate it.
///
/// The construction site is recorded through `#[track_caller]`, so the
/// location points at the code that raised the exception, not at this crate.
///
/// Equality compares code and message only. Location and attached source are
/// diagnostic and do not take part.
pub struct ExceptionBase<C: ErrorCodeEnum> {
    code: C,
    message: String,
    location: &'static Location<'static>,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl<C: ErrorCodeEnum> ExceptionBase<C> {
    /// Create the base state from a code and a message.
    #[track_caller]
    #[inline]
    pub fn new(code: C, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: Location::caller(),
            source: None,
        }
    }

    #[inline]
    pub(crate) fn append_message(&mut self, detail: &str) {
        self.message.push_str(detail);
    }

    #[inline]
    pub(crate) fn replace_message(&mut self, detail: &str) {
        self.message.clear();
        self.message.push_str(detail);
    }

    /// Attach the lower-level error that caused this one.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the typed error code.
    #[inline]
    pub fn code(&self) -> C {
        self.code
    }

    /// Get the numeric error code.
    #[inline]
    pub fn code_value(&self) -> u16 {
        self.code.value()
    }

    /// Get the assembled message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the place where the exception was constructed.
    #[inline]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Get the attached cause, if any.
    #[inline]
    pub fn source_error(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl<C: ErrorCodeEnum> PartialEq for ExceptionBase<C> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message
    }
}

impl<C: ErrorCodeEnum> Eq for ExceptionBase<C> {}

impl<C: ErrorCodeEnum> fmt::Debug for ExceptionBase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionBase")
            .field("code", &self.code)
            .field("value", &self.code.value())
            .field("message", &self.message)
            .field("location", &format_args!("{}:{}", self.location.file(), self.location.line()))
            .field("source", &self.source.as_ref().map(|_| "<PRESENT>"))
            .finish()
    }
}

/// Write the common `Name [#code]: message` rendering.
#[inline]
pub(crate) fn write_exception(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    code: u16,
    message: &str,
) -> fmt::Result {
    write!(f, "{} [#{}]: {}", name, code, message)
}

// ============================================================================
// Raisable Capability
// ============================================================================

/// What every exception in the framework can report about itself.
///
/// Handlers should surface code and message together, the same way the
/// construction traces do (`Factory[#401]: <...>`).
pub trait Exception: Error + Send + Sync + 'static {
    /// Category name (`"Factory"`, `"Signal"`, ...).
    fn exception_name(&self) -> &'static str;

    /// Numeric error code.
    fn code_value(&self) -> u16;

    /// Fully assembled message.
    fn message(&self) -> &str;

    /// Construction site.
    fn location(&self) -> &'static Location<'static>;

    /// Category the code belongs to.
    #[inline]
    fn category(&self) -> Option<ExceptionCategory> {
        ExceptionCategory::of(self.code_value())
    }
}

// ============================================================================
// Error Union
// ============================================================================

/// Any exception raised by the framework.
///
/// Lets code that crosses several subsystems return one error type while
/// keeping each category's typed code intact.
#[must_use = "errors should be handled or logged"]
#[derive(Debug, PartialEq, Eq)]
pub enum DynamicGraphError {
    /// Signal plumbing failure.
    Signal(SignalError),
    /// Task definition failure.
    Task(TaskError),
    /// Feature computation failure.
    Feature(FeatureError),
    /// Entity factory failure.
    Factory(FactoryError),
    /// Dynamic model failure.
    Dynamic(DynamicError),
    /// Tooling failure.
    Tools(ToolsError),
    /// Configuration parsing failure.
    YamlCpp(YamlCppError),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            DynamicGraphError::Signal($inner) => $body,
            DynamicGraphError::Task($inner) => $body,
            DynamicGraphError::Feature($inner) => $body,
            DynamicGraphError::Factory($inner) => $body,
            DynamicGraphError::Dynamic($inner) => $body,
            DynamicGraphError::Tools($inner) => $body,
            DynamicGraphError::YamlCpp($inner) => $body,
        }
    };
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for DynamicGraphError {
                #[inline]
                fn from(err: $ty) -> Self {
                    Self::$variant(err)
                }
            }
        )+
    };
}

impl_from_variant! {
    Signal(SignalError),
    Task(TaskError),
    Feature(FeatureError),
    Factory(FactoryError),
    Dynamic(DynamicError),
    Tools(ToolsError),
    YamlCpp(YamlCppError),
}

impl Exception for DynamicGraphError {
    fn exception_name(&self) -> &'static str {
        dispatch!(self, e => e.exception_name())
    }

    fn code_value(&self) -> u16 {
        dispatch!(self, e => Exception::code_value(e))
    }

    fn message(&self) -> &str {
        dispatch!(self, e => Exception::message(e))
    }

    fn location(&self) -> &'static Location<'static> {
        dispatch!(self, e => Exception::location(e))
    }
}

impl fmt::Display for DynamicGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, e => fmt::Display::fmt(e, f))
    }
}

impl Error for DynamicGraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        dispatch!(self, e => e.source())
    }
}
