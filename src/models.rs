//! Concrete exception types, one per category.
//!
//! Every type offers the same two constructors:
//!
//! - `new(code, message)` keeps the message as given
//! - `with_details(code, message, format_args!(..))` renders the arguments
//!   through [`render_bounded`] and combines the result with the message
//!
//! [`FactoryError`] additionally reports its construction through the
//! leveled trace hook in [`crate::logging`].
//!
//! Values are immutable once returned. Nothing is shared between two
//! instances, so building the same exception twice yields equal values.

use crate::codes::{ErrorCodeEnum, ExceptionCategory};
use crate::convenience::render_bounded;
use crate::definitions::{
    DynamicErrorCode, FactoryErrorCode, FeatureErrorCode, SignalErrorCode, TaskErrorCode,
    ToolsErrorCode, YamlCppErrorCode,
};
use crate::logging::{self, TRACE_DETAIL, TRACE_SUMMARY};
use crate::{Exception, ExceptionBase, write_exception};
use std::error::Error;
use std::fmt;
use std::panic::Location;

/// Accessors and trait impls shared by every exception type.
macro_rules! impl_exception_common {
    ($name:ident, $code:ty) => {
        impl $name {
            /// Attach the lower-level error that caused this one.
            #[inline]
            pub fn with_source(self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
                Self {
                    base: self.base.with_source(source),
                }
            }

            /// Get the typed error code.
            #[inline]
            pub fn code(&self) -> $code {
                self.base.code()
            }

            /// Get the assembled message.
            #[inline]
            pub fn message(&self) -> &str {
                self.base.message()
            }

            /// Get the shared base state.
            #[inline]
            pub fn base(&self) -> &ExceptionBase<$code> {
                &self.base
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_exception(f, Self::EXCEPTION_NAME, self.base.code_value(), self.base.message())
            }
        }

        impl Error for $name {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                self.base.source_error()
            }
        }

        impl Exception for $name {
            #[inline]
            fn exception_name(&self) -> &'static str {
                Self::EXCEPTION_NAME
            }

            #[inline]
            fn code_value(&self) -> u16 {
                self.base.code_value()
            }

            #[inline]
            fn message(&self) -> &str {
                self.base.message()
            }

            #[inline]
            fn location(&self) -> &'static Location<'static> {
                self.base.location()
            }

            #[inline]
            fn category(&self) -> Option<ExceptionCategory> {
                Some(self.base.code().category())
            }
        }
    };
}

// ============================================================================
// Factory
// ============================================================================

/// Failure detected by the entity factory: unknown names, name clashes,
/// plugin loading and script reading.
///
/// Construction emits debug traces through [`crate::logging`]. Tracing never
/// changes the code or the message and never fails the construction.
///
/// # Example
///
/// ```rust
/// use dynamic_graph_exceptions::{FactoryError, FactoryErrorCode};
///
/// let err = FactoryError::with_details(
///     FactoryErrorCode::DynamicLoading,
///     "cannot load plugin ",
///     format_args!("{} ({})", "libdevice.so", "missing symbol"),
/// );
/// assert_eq!(err.message(), "cannot load plugin libdevice.so (missing symbol)");
/// assert_eq!(err.to_string(), "Factory [#404]: cannot load plugin libdevice.so (missing symbol)");
/// ```
#[must_use = "exceptions should be returned or logged"]
#[derive(Debug, PartialEq, Eq)]
pub struct FactoryError {
    base: ExceptionBase<FactoryErrorCode>,
}

impl FactoryError {
    /// Category name shared by every factory exception.
    pub const EXCEPTION_NAME: &'static str = "Factory";

    /// Build from a code and a message, kept exactly as given.
    ///
    /// Emits `Created with message <..>.` at [`TRACE_DETAIL`] and again at
    /// [`TRACE_SUMMARY`].
    #[track_caller]
    pub fn new(code: FactoryErrorCode, message: impl Into<String>) -> Self {
        let base = ExceptionBase::new(code, message);
        for level in [TRACE_DETAIL, TRACE_SUMMARY] {
            logging::emit(
                level,
                Self::EXCEPTION_NAME,
                Some(base.code_value()),
                format_args!("Created with message <{}>.", base.message()),
            );
        }
        Self { base }
    }

    /// Build from a code, a message and formatted detail.
    ///
    /// The detail is rendered into a 256-byte buffer (at most 255 bytes are
    /// kept) and appended to `message`. Emits one detailed record with both
    /// parts and one summary record with the final message.
    #[track_caller]
    pub fn with_details(
        code: FactoryErrorCode,
        message: impl Into<String>,
        details: fmt::Arguments<'_>,
    ) -> Self {
        let mut base = ExceptionBase::new(code, message);
        let rendered = render_bounded(details);

        logging::emit(
            TRACE_DETAIL,
            Self::EXCEPTION_NAME,
            Some(base.code_value()),
            format_args!(
                "Created with message <{}> and buffer <{}>.",
                base.message(),
                rendered
            ),
        );

        base.append_message(rendered.as_str());

        logging::emit(
            TRACE_SUMMARY,
            Self::EXCEPTION_NAME,
            Some(base.code_value()),
            format_args!(
                "Throw exception {}[#{}]: <{}>.",
                Self::EXCEPTION_NAME,
                base.code_value(),
                base.message()
            ),
        );

        Self { base }
    }
}

impl_exception_common!(FactoryError, FactoryErrorCode);

// ============================================================================
// Sibling Categories
// ============================================================================

/// Declare an exception type without construction traces.
///
/// `$compose` is the base method applied to the rendered detail:
/// `append_message` or `replace_message`.
macro_rules! declare_exception {
    (
        $(#[$meta:meta])*
        $name:ident, $code:ty, $label:literal, $compose:ident
    ) => {
        $(#[$meta])*
        #[must_use = "exceptions should be returned or logged"]
        #[derive(Debug, PartialEq, Eq)]
        pub struct $name {
            base: ExceptionBase<$code>,
        }

        impl $name {
            /// Category name shared by every exception of this type.
            pub const EXCEPTION_NAME: &'static str = $label;

            /// Build from a code and a message, kept exactly as given.
            #[track_caller]
            #[inline]
            pub fn new(code: $code, message: impl Into<String>) -> Self {
                Self {
                    base: ExceptionBase::new(code, message),
                }
            }

            /// Build from a code, a message and bounded formatted detail.
            #[track_caller]
            pub fn with_details(
                code: $code,
                message: impl Into<String>,
                details: fmt::Arguments<'_>,
            ) -> Self {
                let mut base = ExceptionBase::new(code, message);
                base.$compose(render_bounded(details).as_str());
                Self { base }
            }
        }

        impl_exception_common!($name, $code);
    };
}

declare_exception! {
    /// Failure while reading, writing or plugging a signal.
    SignalError, SignalErrorCode, "Signal", append_message
}

declare_exception! {
    /// Failure while assembling or evaluating a task.
    TaskError, TaskErrorCode, "Task", append_message
}

declare_exception! {
    /// Failure raised by a feature.
    ///
    /// Unlike the other categories, formatted detail replaces the base
    /// message instead of extending it.
    FeatureError, FeatureErrorCode, "Feature", replace_message
}

declare_exception! {
    /// Failure in the dynamic model.
    DynamicError, DynamicErrorCode, "Dynamic", append_message
}

declare_exception! {
    /// Failure in a helper tool.
    ToolsError, ToolsErrorCode, "Tools", append_message
}

declare_exception! {
    /// Failure reading a typed value from YAML configuration.
    YamlCppError, YamlCppErrorCode, "YamlCpp", append_message
}
