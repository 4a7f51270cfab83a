//! Pre-defined error codes for every exception category.
//!
//! Each enum starts at its category base (see [`crate::codes`]) with a
//! `Generic` variant and counts upwards. Codes are part of the wire-visible
//! contract: handlers and log scrapers match on the numbers, so variants are
//! only ever appended, never reordered.

use crate::define_error_codes;
use crate::codes::ExceptionCategory;

// -----------------------------------------------------------------------------
// Signal (100-199)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures while reading, writing or plugging signals.
    pub enum SignalErrorCode in ExceptionCategory::Signal => {
        /// Unclassified signal failure.
        Generic = "GENERIC",
        /// Signal is locked by another reader or writer.
        ReadwriteLock = "READWRITE_LOCK",
        /// Copy of a signal whose value was never set.
        CopyNotInitialized = "COPY_NOT_INITIALIZED",
        /// Signal read before initialisation.
        NotInitialized = "NOT_INITIALIZED",
        /// Input and output signals cannot be plugged together.
        PlugImpossible = "PLUG_IMPOSSIBLE",
        /// Signal does not accept a constant value.
        SetImpossible = "SET_IMPOSSIBLE",
        /// Signal value has an unexpected type.
        BadCast = "BAD_CAST",
    }
}

// -----------------------------------------------------------------------------
// Task (200-299)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures while assembling or evaluating tasks.
    pub enum TaskErrorCode in ExceptionCategory::Task => {
        /// Unclassified task failure.
        Generic = "GENERIC",
        /// Task has no features.
        EmptyList = "EMPTY_LIST",
        /// Features of a task are not compatible with each other.
        NonAdequateFeatures = "NON_ADEQUATE_FEATURES",
        /// Jacobian or error sizes disagree.
        MatrixSize = "MATRIX_SIZE",
        /// Bound type is not supported.
        BoundType = "BOUND_TYPE",
        /// More than one bound given for the same row.
        ParserMultiBound = "PARSER_MULTI_BOUND",
    }
}

// -----------------------------------------------------------------------------
// Feature (300-399)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures raised by features.
    pub enum FeatureErrorCode in ExceptionCategory::Feature => {
        /// Unclassified feature failure.
        Generic = "GENERIC",
        /// Feature used before its reference was set.
        BadInit = "BAD_INIT",
        /// Feature and reference sizes differ.
        UncompatibleSize = "UNCOMPATIBLE_SIZE",
    }
}

// -----------------------------------------------------------------------------
// Factory (400-499)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures while registering or instantiating entities, signals and
    /// commands.
    pub enum FactoryErrorCode in ExceptionCategory::Factory => {
        /// Unclassified factory failure.
        Generic = "GENERIC",
        /// No entity registered under the requested name.
        UnreferedObject = "UNREFERED_OBJECT",
        /// No signal registered under the requested name.
        UnreferedSignal = "UNREFERED_SIGNAL",
        /// No command registered under the requested name.
        UnreferedFunction = "UNREFERED_FUNCTION",
        /// Plugin library could not be loaded.
        DynamicLoading = "DYNAMIC_LOADING",
        /// Signal name already taken.
        SignalConflict = "SIGNAL_CONFLICT",
        /// Command name already taken.
        FunctionConflict = "FUNCTION_CONFLICT",
        /// Entity name already taken.
        ObjectConflict = "OBJECT_CONFLICT",
        /// Malformed command line.
        SyntaxError = "SYNTAX_ERROR",
        /// Script or configuration file could not be read.
        ReadFile = "READ_FILE",
    }
}

// -----------------------------------------------------------------------------
// Dynamic (500-599)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures in the dynamic model.
    pub enum DynamicErrorCode in ExceptionCategory::Dynamic => {
        /// Unclassified dynamic failure.
        Generic = "GENERIC",
        /// Signal could not be removed from the model.
        CantDestroySignal = "CANT_DESTROY_SIGNAL",
        /// Joint index out of range.
        JointRank = "JOINT_RANK",
        /// Model library failure.
        DynamicJrl = "DYNAMIC_JRL",
        /// Joint vector has the wrong size.
        JointSize = "JOINT_SIZE",
        /// Numerical integration failed.
        Integration = "INTEGRATION",
    }
}

// -----------------------------------------------------------------------------
// Tools (700-799)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures in helper tools.
    pub enum ToolsErrorCode in ExceptionCategory::Tools => {
        /// Unclassified tool failure.
        Generic = "GENERIC",
        /// Middleware communication failure.
        Corba = "CORBA",
        /// Filter state and measurement sizes differ.
        KalmanSize = "KALMAN_SIZE",
        /// Interpreter shell handle missing.
        PyShellPtr = "PY_SHELL_PTR",
    }
}

// -----------------------------------------------------------------------------
// YamlCpp (900-999)
// -----------------------------------------------------------------------------
define_error_codes! {
    /// Failures while reading typed values from YAML configuration.
    pub enum YamlCppErrorCode in ExceptionCategory::YamlCppParsing => {
        /// Unclassified parsing failure.
        Generic = "GENERIC",
        /// Node is not a boolean.
        ParsingBool = "PARSING_BOOL",
        /// Node is not a single-precision float.
        ParsingFloat = "PARSING_FLOAT",
        /// Node is not a double-precision float.
        ParsingDouble = "PARSING_DOUBLE",
        /// Node is not a vector or matrix of the expected shape.
        ParsingEigen = "PARSING_EIGEN",
        /// Node is not a string.
        ParsingString = "PARSING_STRING",
        /// Node is not an unsigned integer.
        ParsingUnsigned = "PARSING_UNSIGNED",
    }
}
