//! Error code namespace - one numeric range per exception category.
//!
//! Codes are small integers. The hundreds digit identifies the category and
//! the remainder identifies the failure inside it:
//!
//! | Category         | Range   |
//! |------------------|---------|
//! | `Signal`         | 100-199 |
//! | `Task`           | 200-299 |
//! | `Feature`        | 300-399 |
//! | `Factory`        | 400-499 |
//! | `Dynamic`        | 500-599 |
//! | `Tools`          | 700-799 |
//! | `YamlCpp`        | 900-999 |
//!
//! Every category's code enum starts with `Generic` at the range base and
//! numbers the remaining variants consecutively. The enums are generated by
//! [`define_error_codes!`], which also checks at compile time that a
//! category never outgrows its hundred slots.
//!
//! # Example
//!
//! ```rust
//! use dynamic_graph_exceptions::{define_error_codes, ErrorCodeEnum, ExceptionCategory};
//!
//! define_error_codes! {
//!     /// Codes for a plugin-loading subsystem.
//!     pub enum LoaderCode in ExceptionCategory::Tools => {
//!         Generic = "GENERIC",
//!         MissingSymbol = "MISSING_SYMBOL",
//!     }
//! }
//!
//! assert_eq!(LoaderCode::MissingSymbol.value(), 701);
//! assert_eq!(LoaderCode::from_value(701), Some(LoaderCode::MissingSymbol));
//! assert_eq!(LoaderCode::MissingSymbol.to_string(), "701");
//! ```

use std::fmt;
use std::hash::Hash;

/// Number of codes reserved for each category.
pub const CATEGORY_SPAN: u16 = 100;

// ============================================================================
// Exception Category
// ============================================================================

/// Exception family an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionCategory {
    /// Signal read/write, plugging and casting
    Signal,
    /// Task stacks and bounds
    Task,
    /// Feature initialisation and sizes
    Feature,
    /// Entity, signal and command registration
    Factory,
    /// Dynamic model and integration
    Dynamic,
    /// Helper tools (filters, shells, middleware)
    Tools,
    /// YAML configuration parsing
    YamlCppParsing,
}

impl ExceptionCategory {
    /// Every category, in range order.
    pub const ALL: [Self; 7] = [
        Self::Signal,
        Self::Task,
        Self::Feature,
        Self::Factory,
        Self::Dynamic,
        Self::Tools,
        Self::YamlCppParsing,
    ];

    /// First code of the range (the `Generic` code).
    #[inline]
    pub const fn base(self) -> u16 {
        match self {
            Self::Signal => 100,
            Self::Task => 200,
            Self::Feature => 300,
            Self::Factory => 400,
            Self::Dynamic => 500,
            Self::Tools => 700,
            Self::YamlCppParsing => 900,
        }
    }

    /// Last code of the range.
    #[inline]
    pub const fn end(self) -> u16 {
        self.base() + CATEGORY_SPAN - 1
    }

    /// Check whether `value` falls in this category's range.
    #[inline]
    pub const fn contains(self, value: u16) -> bool {
        value >= self.base() && value <= self.end()
    }

    /// Category name used in traces and `Display`.
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Signal => "Signal",
            Self::Task => "Task",
            Self::Feature => "Feature",
            Self::Factory => "Factory",
            Self::Dynamic => "Dynamic",
            Self::Tools => "Tools",
            Self::YamlCppParsing => "YamlCpp",
        }
    }

    /// Map a raw code back to its category.
    ///
    /// Returns `None` for values in unassigned ranges (0-99, 600-699, 800-899)
    /// or above 999.
    #[inline]
    pub const fn of(value: u16) -> Option<Self> {
        match value / CATEGORY_SPAN {
            1 => Some(Self::Signal),
            2 => Some(Self::Task),
            3 => Some(Self::Feature),
            4 => Some(Self::Factory),
            5 => Some(Self::Dynamic),
            7 => Some(Self::Tools),
            9 => Some(Self::YamlCppParsing),
            _ => None,
        }
    }
}

impl fmt::Display for ExceptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Error Code Trait
// ============================================================================

/// Behaviour shared by every per-category code enum.
///
/// Implemented by [`define_error_codes!`]; there is no need to implement it
/// by hand.
pub trait ErrorCodeEnum:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Category every variant belongs to.
    const CATEGORY: ExceptionCategory;

    /// Numeric code.
    fn value(self) -> u16;

    /// SCREAMING_CASE label.
    fn name(self) -> &'static str;

    /// Look a variant up by numeric code.
    fn from_value(value: u16) -> Option<Self>;

    /// Category of this code.
    #[inline]
    fn category(self) -> ExceptionCategory {
        Self::CATEGORY
    }
}

/// Define a category's code enum.
///
/// The first variant receives the category base; each following variant the
/// next integer. Variant labels are the names used in logs.
///
/// Generates:
/// - the enum itself (`Copy`, `Eq`, `Hash`, `Debug`)
/// - `const fn value`, `const fn name`, `fn from_value` and `VARIANTS`
/// - `Display` (the numeric value) and `From<Enum> for u16`
/// - an [`ErrorCodeEnum`] implementation
/// - a compile-time check that the enum fits in its hundred codes
#[macro_export]
macro_rules! define_error_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $category:expr => {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in code order.
            pub const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            /// Numeric code.
            #[inline]
            pub const fn value(self) -> u16 {
                ($category).base() + self as u16
            }

            /// SCREAMING_CASE label.
            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Look a variant up by numeric code.
            #[inline]
            pub fn from_value(value: u16) -> ::core::option::Option<Self> {
                let category = $category;
                if !category.contains(value) {
                    return None;
                }
                Self::VARIANTS.get((value - category.base()) as usize).copied()
            }
        }

        const _: () = assert!(
            $name::VARIANTS.len() <= $crate::codes::CATEGORY_SPAN as usize,
            "Too many codes for one category"
        );

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.value())
            }
        }

        impl ::core::convert::From<$name> for u16 {
            #[inline]
            fn from(code: $name) -> u16 {
                code.value()
            }
        }

        impl $crate::codes::ErrorCodeEnum for $name {
            const CATEGORY: $crate::codes::ExceptionCategory = $category;

            #[inline]
            fn value(self) -> u16 {
                $name::value(self)
            }

            #[inline]
            fn name(self) -> &'static str {
                $name::name(self)
            }

            #[inline]
            fn from_value(value: u16) -> ::core::option::Option<Self> {
                $name::from_value(value)
            }
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
