//! Module: codec::coerce
//! Responsibility: static coercion/cast lattice and value conversion.
//! Does not own: byte encoding.
//! Boundary: every codec entry point converts through `convert` first.

use crate::{
    codec::{DataType, scalar::encode_scalar},
    error::{ErrorOrigin, InternalError},
    types::{Date, Decimal, Time, Timestamp},
    value::{ArrayValue, Value},
};
use lexdb_primitives::{ScalarFamily, ScalarKind};
use rust_decimal::prelude::ToPrimitive;

/// Implicit widening allowed for comparison and assignment.
#[must_use]
pub const fn is_kind_coercible(from: ScalarKind, to: ScalarKind) -> bool {
    use ScalarKind as K;

    if from as u8 == to as u8 {
        return true;
    }

    match (from, to) {
        (_, K::Varbinary)
        | (K::TinyInt, K::SmallInt)
        | (K::TinyInt | K::SmallInt, K::Integer)
        | (K::TinyInt | K::SmallInt | K::Integer, K::BigInt)
        | (K::TinyInt | K::SmallInt | K::Integer | K::BigInt, K::Float | K::Double | K::Decimal)
        | (K::Float, K::Double | K::Decimal)
        | (K::Double, K::Decimal)
        | (K::Date | K::Time | K::Timestamp, K::Date | K::Time | K::Timestamp) => true,
        _ => false,
    }
}

/// Explicit conversions: coercion plus narrowing and cross-family casts.
#[must_use]
pub const fn is_kind_castable(from: ScalarKind, to: ScalarKind) -> bool {
    use ScalarKind as K;

    if is_kind_coercible(from, to) {
        return true;
    }

    match (from, to) {
        (_, K::Varchar) | (K::Boolean, K::Decimal) | (K::Decimal, K::Boolean) => true,
        (K::Date | K::Time | K::Timestamp, K::BigInt) => true,
        _ => from.is_numeric() && to.is_numeric(),
    }
}

/// Convert `value` into the native representation of `target`.
///
/// The value's own type must be castable to `target`; narrowing that loses
/// the integer part reports `CapacityExceeded`.
pub fn convert(value: &Value, target: DataType) -> Result<Value, InternalError> {
    let Some(source) = value.data_type() else {
        return Ok(Value::Null);
    };
    if source == target {
        return Ok(value.clone());
    }
    if !source.is_castable_to(target) {
        return Err(InternalError::type_mismatch(ErrorOrigin::Codec, source, target));
    }

    match (value, target) {
        (Value::Array(array), DataType::Array(element)) => {
            let elements = array
                .elements()
                .iter()
                .map(|element_value| convert(element_value, DataType::Scalar(element)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(ArrayValue::new(element, elements)))
        }
        (_, DataType::Scalar(kind)) => convert_scalar(value, kind),
        _ => Err(InternalError::type_mismatch(ErrorOrigin::Codec, source, target)),
    }
}

fn convert_scalar(value: &Value, kind: ScalarKind) -> Result<Value, InternalError> {
    match kind.family() {
        ScalarFamily::Boolean => match value {
            Value::Decimal(v) => Ok(Value::Boolean(!v.is_zero())),
            other => Err(mismatch(other, kind)),
        },
        ScalarFamily::Integral => to_integral(value, kind),
        ScalarFamily::Floating => {
            let wide = to_f64(value).ok_or_else(|| mismatch(value, kind))?;
            #[allow(clippy::cast_possible_truncation)]
            let converted = if kind == ScalarKind::Float {
                Value::Float(wide as f32)
            } else {
                Value::Double(wide)
            };
            Ok(converted)
        }
        ScalarFamily::Decimal => to_decimal(value).map(Value::Decimal),
        ScalarFamily::Temporal => {
            let (millis, nanos) = match value {
                Value::Date(v) => (v.millis(), 0),
                Value::Time(v) => (v.millis(), 0),
                Value::Timestamp(v) => (v.millis(), v.nanos()),
                other => return Err(mismatch(other, kind)),
            };
            Ok(match kind {
                ScalarKind::Date => Value::Date(Date::from_millis(millis)),
                ScalarKind::Time => Value::Time(Time::from_millis(millis)),
                _ => Value::Timestamp(Timestamp::new(millis, nanos).unwrap_or_default()),
            })
        }
        ScalarFamily::Textual => Ok(Value::Varchar(value.to_string())),
        ScalarFamily::Binary => match value {
            Value::Varchar(text) => Ok(Value::Varbinary(text.as_bytes().to_vec())),
            other => {
                // other scalars become their own ascending encoding
                let Some(DataType::Scalar(source)) = other.data_type() else {
                    return Err(mismatch(other, kind));
                };
                let mut out = Vec::new();
                encode_scalar(source, other, &mut out)?;
                Ok(Value::Varbinary(out))
            }
        },
    }
}

fn to_integral(value: &Value, kind: ScalarKind) -> Result<Value, InternalError> {
    let wide = match value {
        Value::Float(v) => float_to_i64(f64::from(*v), kind)?,
        Value::Double(v) => float_to_i64(*v, kind)?,
        Value::Decimal(v) => v.trunc().to_i64().ok_or_else(|| overflow(value, kind))?,
        other => other
            .as_i64()
            .or_else(|| other.as_epoch_millis())
            .ok_or_else(|| mismatch(other, kind))?,
    };

    let converted = match kind {
        ScalarKind::TinyInt => i8::try_from(wide).map(Value::TinyInt).ok(),
        ScalarKind::SmallInt => i16::try_from(wide).map(Value::SmallInt).ok(),
        ScalarKind::Integer => i32::try_from(wide).map(Value::Integer).ok(),
        _ => Some(Value::BigInt(wide)),
    };

    converted.ok_or_else(|| overflow(value, kind))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(value: f64, kind: ScalarKind) -> Result<i64, InternalError> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(InternalError::capacity_exceeded(
            ErrorOrigin::Codec,
            format!("value {value} does not fit {kind}"),
        ));
    }

    Ok(truncated as i64)
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(v) => Some(f64::from(*v)),
        Value::Double(v) => Some(*v),
        Value::Decimal(v) => v.to_f64(),
        other => other.as_i64().map(|v| v as f64),
    }
}

pub(crate) fn to_decimal(value: &Value) -> Result<Decimal, InternalError> {
    let decimal = match value {
        Value::Decimal(v) => Some(*v),
        Value::Boolean(v) => Some(if *v { Decimal::ONE } else { Decimal::ZERO }),
        Value::Float(v) => Decimal::from_f32_retain(*v),
        Value::Double(v) => Decimal::from_f64_retain(*v),
        other => other.as_i64().map(Decimal::from),
    };

    decimal.ok_or_else(|| overflow(value, ScalarKind::Decimal))
}

fn mismatch(value: &Value, kind: ScalarKind) -> InternalError {
    match value.data_type() {
        Some(actual) => InternalError::type_mismatch(ErrorOrigin::Codec, actual, DataType::Scalar(kind)),
        None => InternalError::codec_illegal_data(format!("cannot convert {value} to {kind}")),
    }
}

fn overflow(value: &Value, kind: ScalarKind) -> InternalError {
    InternalError::capacity_exceeded(ErrorOrigin::Codec, format!("value {value} does not fit {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdb_primitives::ALL_SCALAR_KINDS;

    #[test]
    fn coercion_is_a_subset_of_casting() {
        for from in ALL_SCALAR_KINDS {
            for to in ALL_SCALAR_KINDS {
                if is_kind_coercible(from, to) {
                    assert!(is_kind_castable(from, to), "{from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn integral_widening_is_one_directional() {
        assert!(is_kind_coercible(ScalarKind::TinyInt, ScalarKind::BigInt));
        assert!(is_kind_coercible(ScalarKind::Integer, ScalarKind::Decimal));
        assert!(!is_kind_coercible(ScalarKind::BigInt, ScalarKind::Integer));
        assert!(is_kind_castable(ScalarKind::BigInt, ScalarKind::Integer));
        assert!(!is_kind_coercible(ScalarKind::Decimal, ScalarKind::Double));
        assert!(!is_kind_coercible(ScalarKind::Boolean, ScalarKind::Integer));
        assert!(!is_kind_castable(ScalarKind::Varchar, ScalarKind::Integer));
    }

    #[test]
    fn boolean_from_decimal_is_non_zero_test() {
        let target = DataType::Scalar(ScalarKind::Boolean);
        assert_eq!(
            convert(&Value::Decimal(Decimal::new(5, 1)), target).expect("castable"),
            Value::Boolean(true)
        );
        assert_eq!(
            convert(&Value::Decimal(Decimal::ZERO), target).expect("castable"),
            Value::Boolean(false)
        );
    }

    #[test]
    fn narrowing_reports_capacity_exceeded() {
        let err = convert(&Value::BigInt(300), DataType::Scalar(ScalarKind::TinyInt))
            .expect_err("300 does not fit TINYINT");
        assert_eq!(err.class, crate::error::ErrorClass::CapacityExceeded);
        assert_eq!(
            convert(&Value::BigInt(-7), DataType::Scalar(ScalarKind::TinyInt)).expect("fits"),
            Value::TinyInt(-7)
        );
    }

    #[test]
    fn incompatible_conversion_is_constraint_violation() {
        let err = convert(&Value::varchar("x"), DataType::Scalar(ScalarKind::BigInt))
            .expect_err("text is not castable to BIGINT");
        assert_eq!(err.class, crate::error::ErrorClass::ConstraintViolation);
    }

    #[test]
    fn temporal_conversions_keep_millis() {
        let ts = Timestamp::new(86_400_123, 7).expect("valid");
        assert_eq!(
            convert(&Value::Timestamp(ts), DataType::Scalar(ScalarKind::Date)).expect("castable"),
            Value::Date(Date::from_millis(86_400_123))
        );
        assert_eq!(
            convert(&Value::Date(Date::from_millis(5)), DataType::Scalar(ScalarKind::BigInt))
                .expect("castable"),
            Value::BigInt(5)
        );
    }
}
