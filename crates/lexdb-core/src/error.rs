use crate::codec::DataType;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured codec/evaluation error with a stable classification.
/// Every class signals a logic or schema fault, so nothing here is retried.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Malformed bytes, or null offered to a type that cannot represent it.
    pub(crate) fn illegal_data(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::IllegalData, origin, message)
    }

    /// Construct a codec-origin illegal-data error.
    pub(crate) fn codec_illegal_data(message: impl Into<String>) -> Self {
        Self::illegal_data(ErrorOrigin::Codec, message)
    }

    /// Construct a standardized "cannot convert" constraint violation.
    pub(crate) fn type_mismatch(origin: ErrorOrigin, actual: DataType, expected: DataType) -> Self {
        Self::new(
            ErrorClass::ConstraintViolation,
            origin,
            format!("type mismatch: {actual} cannot be converted to {expected}"),
        )
    }

    pub(crate) fn constraint_violation(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::ConstraintViolation, origin, message)
    }

    /// Value does not fit the declared precision/scale (or byte budget).
    pub(crate) fn capacity_exceeded(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::CapacityExceeded, origin, message)
    }

    /// Decimal value does not fit `DECIMAL(precision, scale)`.
    pub(crate) fn decimal_capacity_exceeded(
        precision: Option<u32>,
        scale: Option<u32>,
        value: Option<&dyn fmt::Display>,
    ) -> Self {
        let width = match (precision, scale) {
            (Some(p), Some(s)) => format!("DECIMAL({p},{s})"),
            (Some(p), None) => format!("DECIMAL({p})"),
            _ => "DECIMAL".to_string(),
        };
        let message = match value {
            Some(value) => format!("data exceeds capacity: {value} does not fit {width}"),
            None => format!("data exceeds capacity: no value produced for {width}"),
        };

        Self::capacity_exceeded(ErrorOrigin::Expression, message)
    }

    /// Fixed-width key field evaluated to null before the terminal position.
    pub(crate) fn structural_key(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::StructuralKey, ErrorOrigin::Key, message)
    }

    /// All classes describe deterministic faults; callers must not retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorClass {
    IllegalData,
    ConstraintViolation,
    CapacityExceeded,
    StructuralKey,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::IllegalData => "illegal_data",
            Self::ConstraintViolation => "constraint_violation",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::StructuralKey => "structural_key",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorOrigin {
    Codec,
    Array,
    Expression,
    Key,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Array => "array",
            Self::Expression => "expression",
            Self::Key => "key",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
