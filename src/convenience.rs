//! Bounded formatting and construction macros.
//!
//! Formatted exception details are rendered with `format_args!`, so argument
//! and format mismatches are compile errors instead of undefined behaviour.
//! The rendered text goes into a fixed 256-byte buffer and is cut silently
//! past 255 bytes, which keeps messages the same length a C `vsnprintf` into
//! a `char[256]` would produce.
//!
//! # Usage
//!
//! ```rust
//! # use dynamic_graph_exceptions::{exception, factory_err, FactoryErrorCode, SignalError, SignalErrorCode};
//! // Plain message
//! let err = factory_err!(FactoryErrorCode::ObjectConflict, "entity already exists");
//! assert_eq!(err.message(), "entity already exists");
//!
//! // Message plus formatted detail
//! let err = factory_err!(FactoryErrorCode::SyntaxError, "bad param: ", "{}={}", "x", 5);
//! assert_eq!(err.message(), "bad param: x=5");
//!
//! // Any other category
//! let err = exception!(SignalError, SignalErrorCode::Generic, "state signal size is ", "{}, should be 1.", 3);
//! assert_eq!(err.message(), "state signal size is 3, should be 1.");
//! ```

use smallvec::SmallVec;
use std::fmt;

/// Size of the detail buffer, terminator included.
pub const FORMAT_BUFFER_SIZE: usize = 256;

/// Longest rendered detail that is kept.
pub const MAX_RENDERED_LEN: usize = FORMAT_BUFFER_SIZE - 1;

// ============================================================================
// Bounded Rendering
// ============================================================================

/// Detail text rendered into the fixed buffer.
///
/// Lives on the stack; nothing is allocated unless the caller copies it out.
#[derive(Clone)]
pub struct RenderedDetail {
    bytes: SmallVec<[u8; FORMAT_BUFFER_SIZE]>,
    truncated: bool,
}

impl RenderedDetail {
    #[inline]
    fn new() -> Self {
        Self {
            bytes: SmallVec::new(),
            truncated: false,
        }
    }

    /// Rendered text.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only whole characters are ever written.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Rendered length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether nothing was rendered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check whether output was cut to fit the buffer.
    #[inline]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Write for RenderedDetail {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = MAX_RENDERED_LEN - self.bytes.len();
        if s.len() <= room {
            self.bytes.extend_from_slice(s.as_bytes());
            return Ok(());
        }

        let mut cut = room;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.bytes.extend_from_slice(&s.as_bytes()[..cut]);
        self.truncated = true;
        Ok(())
    }
}

impl fmt::Display for RenderedDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RenderedDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedDetail")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}

/// Render `args` into a 256-byte buffer.
///
/// Keeps at most [`MAX_RENDERED_LEN`] bytes and never splits a UTF-8
/// character, so multi-byte text may stop a few bytes short. Never fails: if
/// an argument's `Display` implementation reports an error, whatever it wrote
/// before that is kept.
///
/// ```rust
/// # use dynamic_graph_exceptions::render_bounded;
/// let rendered = render_bounded(format_args!("{}", "x".repeat(300)));
/// assert_eq!(rendered.len(), 255);
/// assert!(rendered.is_truncated());
/// ```
pub fn render_bounded(args: fmt::Arguments<'_>) -> RenderedDetail {
    let mut out = RenderedDetail::new();
    let _ = fmt::write(&mut out, args);
    out
}

// ============================================================================
// Construction Macros
// ============================================================================

/// Build a [`FactoryError`](crate::FactoryError).
///
/// `factory_err!(code, message)` uses the plain constructor;
/// `factory_err!(code, message, "format", args...)` appends the bounded
/// rendering of the format arguments.
#[macro_export]
macro_rules! factory_err {
    ($code:expr, $msg:expr $(,)?) => {
        $crate::FactoryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::FactoryError::with_details($code, $msg, ::std::format_args!($fmt $(, $arg)*))
    };
}

/// Build any exception type from a code, a message and optional format
/// arguments.
///
/// ```rust
/// # use dynamic_graph_exceptions::{exception, YamlCppError, YamlCppErrorCode};
/// let err = exception!(
///     YamlCppError,
///     YamlCppErrorCode::ParsingUnsigned,
///     "Fail to parse yaml file. Node is: hardware_communication: ",
///     "{}",
///     "max_missed_control"
/// );
/// assert!(err.message().ends_with("max_missed_control"));
/// ```
#[macro_export]
macro_rules! exception {
    ($ty:ty, $code:expr, $msg:expr $(,)?) => {
        <$ty>::new($code, $msg)
    };
    ($ty:ty, $code:expr, $msg:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        <$ty>::with_details($code, $msg, ::std::format_args!($fmt $(, $arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactoryErrorCode, FeatureError, FeatureErrorCode};

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn short_output_is_untouched() {
        let rendered = render_bounded(format_args!("{}={}", "x", 5));
        assert_eq!(rendered.as_str(), "x=5");
        assert!(!rendered.is_truncated());
    }

    #[test]
    fn empty_format_renders_nothing() {
        let rendered = render_bounded(format_args!(""));
        assert!(rendered.is_empty());
        assert!(!rendered.is_truncated());
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(MAX_RENDERED_LEN);
        let rendered = render_bounded(format_args!("{}", s));
        assert_eq!(rendered.len(), MAX_RENDERED_LEN);
        assert!(!rendered.is_truncated());
    }

    #[test]
    fn one_over_limit() {
        let s = "a".repeat(MAX_RENDERED_LEN + 1);
        let rendered = render_bounded(format_args!("{}", s));
        assert_eq!(rendered.len(), MAX_RENDERED_LEN);
        assert!(rendered.is_truncated());
    }

    #[test]
    fn truncation_spans_several_writes() {
        let chunk = "b".repeat(100);
        let rendered = render_bounded(format_args!("{}{}{}-tail", chunk, chunk, chunk));
        assert_eq!(rendered.len(), MAX_RENDERED_LEN);
        assert!(rendered.as_str().chars().all(|c| c == 'b'));
    }

    #[test]
    fn truncate_utf8_boundary() {
        // 'й' is 2 bytes, so 255 bytes would split the 128th character.
        let s = "й".repeat(200);
        let rendered = render_bounded(format_args!("{}", s));
        assert_eq!(rendered.len(), 254);
        assert_eq!(rendered.as_str().chars().count(), 127);
        assert!(rendered.is_truncated());
    }

    #[test]
    fn truncate_emoji() {
        let s = "🔥".repeat(100);
        let rendered = render_bounded(format_args!("{}", s));
        assert!(std::str::from_utf8(rendered.as_str().as_bytes()).is_ok());
        assert_eq!(rendered.len(), 252);
    }

    #[test]
    fn failing_display_keeps_partial_output() {
        let rendered = render_bounded(format_args!("[{}]", Failing));
        assert_eq!(rendered.as_str(), "[partial");
    }

    #[test]
    fn macro_without_format_uses_plain_form() {
        let err = factory_err!(FactoryErrorCode::UnreferedSignal, "sig");
        assert_eq!(err.message(), "sig");
    }

    #[test]
    fn macro_accepts_trailing_comma() {
        let err = factory_err!(FactoryErrorCode::Generic, "a", "{}", 1,);
        assert_eq!(err.message(), "a1");
    }

    #[test]
    fn generic_macro_reaches_every_type() {
        let err = exception!(FeatureError, FeatureErrorCode::UncompatibleSize, "ignored", "dim {}", 6);
        assert_eq!(err.message(), "dim 6");
    }
}
