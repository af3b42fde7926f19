mod compare;

#[cfg(test)]
mod tests;

use crate::{
    codec::DataType,
    types::{Date, Decimal, Time, Timestamp},
};
use lexdb_primitives::ScalarKind;
use std::fmt;

// re-exports
pub use compare::compare_values;

///
/// Value
///
/// Native SQL value domain shared by every codec.
///
/// Null        → SQL NULL; encodes to zero bytes for variable-width types.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Date(Date),
    Time(Time),
    Timestamp(Timestamp),
    Varchar(String),
    Varbinary(Vec<u8>),
    Array(ArrayValue),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Return the type this value natively belongs to (`None` for null).
    #[must_use]
    pub const fn data_type(&self) -> Option<DataType> {
        let kind = match self {
            Self::Null => return None,
            Self::Array(array) => return Some(DataType::Array(array.element)),
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::TinyInt(_) => ScalarKind::TinyInt,
            Self::SmallInt(_) => ScalarKind::SmallInt,
            Self::Integer(_) => ScalarKind::Integer,
            Self::BigInt(_) => ScalarKind::BigInt,
            Self::Float(_) => ScalarKind::Float,
            Self::Double(_) => ScalarKind::Double,
            Self::Decimal(_) => ScalarKind::Decimal,
            Self::Date(_) => ScalarKind::Date,
            Self::Time(_) => ScalarKind::Time,
            Self::Timestamp(_) => ScalarKind::Timestamp,
            Self::Varchar(_) => ScalarKind::Varchar,
            Self::Varbinary(_) => ScalarKind::Varbinary,
        };

        Some(DataType::Scalar(kind))
    }

    /// Widen any integral value to `i64`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::TinyInt(v) => Some(*v as i64),
            Self::SmallInt(v) => Some(*v as i64),
            Self::Integer(v) => Some(*v as i64),
            Self::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Epoch milliseconds of a temporal value.
    #[must_use]
    pub const fn as_epoch_millis(&self) -> Option<i64> {
        match self {
            Self::Date(v) => Some(v.millis()),
            Self::Time(v) => Some(v.millis()),
            Self::Timestamp(v) => Some(v.millis()),
            _ => None,
        }
    }

    #[must_use]
    pub fn varchar(text: impl Into<String>) -> Self {
        Self::Varchar(text.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::TinyInt(v) => write!(f, "{v}"),
            Self::SmallInt(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Varchar(v) => f.write_str(v),
            Self::Varbinary(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Array(array) => write!(f, "{array}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Varchar(value.to_string())
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

///
/// ArrayValue
///
/// Homogeneous element sequence; elements are either null or of `element`'s
/// native variant.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    element: ScalarKind,
    elements: Vec<Value>,
}

impl ArrayValue {
    #[must_use]
    pub const fn new(element: ScalarKind, elements: Vec<Value>) -> Self {
        Self { element, elements }
    }

    #[must_use]
    pub const fn element(&self) -> ScalarKind {
        self.element
    }

    #[must_use]
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}
