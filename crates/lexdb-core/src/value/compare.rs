use crate::value::Value;
use std::cmp::Ordering;

/// Native ordering of two values of the same variant.
///
/// Null sorts before everything; floats use the IEEE total order. Values of
/// different variants are not comparable and yield `None`.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    let ordering = match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (Value::TinyInt(a), Value::TinyInt(b)) => a.cmp(b),
        (Value::SmallInt(a), Value::SmallInt(b)) => a.cmp(b),
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::BigInt(a), Value::BigInt(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
        (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Varchar(a), Value::Varchar(b)) => a.cmp(b),
        (Value::Varbinary(a), Value::Varbinary(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            if a.element() != b.element() {
                return None;
            }
            for (x, y) in a.elements().iter().zip(b.elements()) {
                match compare_values(x, y)? {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
            }
            a.len().cmp(&b.len())
        }
        _ => return None,
    };

    Some(ordering)
}
