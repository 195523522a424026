//! Evaluation error types.
//!
//! Evaluation failures are not `Result` errors: they travel through the
//! expression as `Value::Error` sentinels so that short-circuiting operators
//! can observe and suppress them like any other operand.

use std::fmt;

/// An error produced while evaluating a CEL expression.
#[derive(Debug, Clone)]
pub struct EvalError {
    /// The error message.
    pub message: String,
    /// The kind of error.
    pub kind: EvalErrorKind,
}

/// The kind of evaluation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// Integer division by zero.
    DivideByZero,
    /// Integer modulus by zero.
    ModulusByZero,
    /// 64-bit integer overflow.
    Overflow,
    /// Duration arithmetic left the representable range.
    DurationOverflow,
    /// Timestamp arithmetic left the representable range.
    TimestampOverflow,
    /// Unknown function name.
    UnknownFunction,
    /// List index out of range.
    IndexOutOfRange,
    /// Map key not present.
    NoSuchKey,
    /// Invalid argument (bad regex, bad timezone, ...).
    InvalidArgument,
    /// No overload applies to the argument types.
    NoSuchOverload,
    /// No conversion path between two value kinds.
    InvalidConversion,
    /// Unexpected internal state.
    Internal,
}

impl EvalError {
    /// Create a new error with the given kind and message.
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Division by zero.
    pub fn divide_by_zero() -> Self {
        Self::new(EvalErrorKind::DivideByZero, "divide by zero")
    }

    /// Modulus by zero.
    pub fn modulus_by_zero() -> Self {
        Self::new(EvalErrorKind::ModulusByZero, "modulus by zero")
    }

    /// Signed 64-bit integer overflow.
    pub fn int_overflow() -> Self {
        Self::new(EvalErrorKind::Overflow, "integer overflow")
    }

    /// Unsigned 64-bit integer overflow.
    pub fn uint_overflow() -> Self {
        Self::new(EvalErrorKind::Overflow, "unsigned integer overflow")
    }

    /// Duration out of the representable range.
    pub fn duration_overflow() -> Self {
        Self::new(EvalErrorKind::DurationOverflow, "duration overflow")
    }

    /// Timestamp out of the representable range.
    pub fn timestamp_overflow() -> Self {
        Self::new(EvalErrorKind::TimestampOverflow, "timestamp overflow")
    }

    /// Bare "no such overload" without argument diagnostics.
    pub fn no_such_overload() -> Self {
        Self::new(EvalErrorKind::NoSuchOverload, "no such overload")
    }

    /// "no such overload" tagged with the function name and argument types.
    pub fn no_such_overload_for(func: &str, arg_types: &[&str]) -> Self {
        Self::new(
            EvalErrorKind::NoSuchOverload,
            format!("no such overload: {}({})", func, arg_types.join(", ")),
        )
    }

    /// Unknown function name.
    pub fn unknown_function(name: &str) -> Self {
        Self::new(
            EvalErrorKind::UnknownFunction,
            format!("unknown function: {}", name),
        )
    }

    /// List index out of range.
    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        Self::new(
            EvalErrorKind::IndexOutOfRange,
            format!("index {} out of range for list of length {}", index, len),
        )
    }

    /// Map key not present.
    pub fn no_such_key(key: &str) -> Self {
        Self::new(EvalErrorKind::NoSuchKey, format!("no such key: {}", key))
    }

    /// Invalid argument.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::InvalidArgument, message)
    }

    /// No conversion path between the two named types.
    pub fn type_conversion(from: &str, to: &str) -> Self {
        Self::new(
            EvalErrorKind::InvalidConversion,
            format!("type conversion error from '{}' to '{}'", from, to),
        )
    }

    /// Unexpected internal state.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Internal, message)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<&str> for EvalError {
    fn from(s: &str) -> Self {
        Self::new(EvalErrorKind::Internal, s)
    }
}

impl From<String> for EvalError {
    fn from(s: String) -> Self {
        Self::new(EvalErrorKind::Internal, s)
    }
}
