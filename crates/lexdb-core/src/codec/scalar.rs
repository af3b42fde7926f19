//! Module: codec::scalar
//! Responsibility: ascending payload encode/decode for one scalar kind.
//! Does not own: type conversion or sort-direction inversion.
//! Boundary: `DataType` converts first, then calls into this module.

use crate::{
    codec::{
        DataType,
        bytes::{escaped_len, push_escaped, unescape},
        decimal::{decimal_encoded_len, decode_decimal, push_decimal},
        ordered::{
            f32_from_ordered, f64_from_ordered, i8_from_ordered, i16_from_ordered,
            i32_from_ordered, i64_from_ordered, ordered_f32_bytes, ordered_f64_bytes,
            ordered_i8_bytes, ordered_i16_bytes, ordered_i32_bytes, ordered_i64_bytes, read_array,
        },
    },
    error::{ErrorOrigin, InternalError},
    types::{Date, Time, Timestamp},
    value::Value,
};
use lexdb_primitives::ScalarKind;

const TRUE_BYTE: u8 = 0x01;
const FALSE_BYTE: u8 = 0x00;

/// Append the ascending encoding of `value`, which must already be native to
/// `kind`. Null appends nothing.
pub(crate) fn encode_scalar(
    kind: ScalarKind,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), InternalError> {
    match (kind, value) {
        (_, Value::Null) => {}
        (ScalarKind::Boolean, Value::Boolean(v)) => {
            out.push(if *v { TRUE_BYTE } else { FALSE_BYTE });
        }
        (ScalarKind::TinyInt, Value::TinyInt(v)) => out.extend_from_slice(&ordered_i8_bytes(*v)),
        (ScalarKind::SmallInt, Value::SmallInt(v)) => out.extend_from_slice(&ordered_i16_bytes(*v)),
        (ScalarKind::Integer, Value::Integer(v)) => out.extend_from_slice(&ordered_i32_bytes(*v)),
        (ScalarKind::BigInt, Value::BigInt(v)) => out.extend_from_slice(&ordered_i64_bytes(*v)),
        (ScalarKind::Float, Value::Float(v)) => out.extend_from_slice(&ordered_f32_bytes(*v)),
        (ScalarKind::Double, Value::Double(v)) => out.extend_from_slice(&ordered_f64_bytes(*v)),
        (ScalarKind::Decimal, Value::Decimal(v)) => push_decimal(out, *v)?,
        (ScalarKind::Date, Value::Date(v)) => out.extend_from_slice(&ordered_i64_bytes(v.millis())),
        (ScalarKind::Time, Value::Time(v)) => out.extend_from_slice(&ordered_i64_bytes(v.millis())),
        (ScalarKind::Timestamp, Value::Timestamp(v)) => {
            out.extend_from_slice(&ordered_i64_bytes(v.millis()));
            out.extend_from_slice(&v.nanos().to_be_bytes());
        }
        (ScalarKind::Varchar, Value::Varchar(v)) => push_escaped(out, v.as_bytes()),
        (ScalarKind::Varbinary, Value::Varbinary(v)) => push_escaped(out, v),
        (kind, other) => {
            return Err(match other.data_type() {
                Some(actual) => {
                    InternalError::type_mismatch(ErrorOrigin::Codec, actual, DataType::Scalar(kind))
                }
                None => InternalError::codec_illegal_data(format!("cannot encode {other} as {kind}")),
            });
        }
    }

    Ok(())
}

/// Decode a non-empty ascending window into the native value of `kind`.
pub(crate) fn decode_scalar(kind: ScalarKind, bytes: &[u8]) -> Result<Value, InternalError> {
    if let Some(width) = kind.byte_width()
        && bytes.len() != width
    {
        return Err(InternalError::codec_illegal_data(format!(
            "{kind} expects {width} bytes, found {}",
            bytes.len()
        )));
    }

    let value = match kind {
        ScalarKind::Boolean => match bytes[0] {
            TRUE_BYTE => Value::Boolean(true),
            FALSE_BYTE => Value::Boolean(false),
            other => {
                return Err(InternalError::codec_illegal_data(format!(
                    "invalid BOOLEAN byte 0x{other:02x}"
                )));
            }
        },
        ScalarKind::TinyInt => Value::TinyInt(i8_from_ordered(fixed(bytes)?)),
        ScalarKind::SmallInt => Value::SmallInt(i16_from_ordered(fixed(bytes)?)),
        ScalarKind::Integer => Value::Integer(i32_from_ordered(fixed(bytes)?)),
        ScalarKind::BigInt => Value::BigInt(i64_from_ordered(fixed(bytes)?)),
        ScalarKind::Float => Value::Float(f32_from_ordered(fixed(bytes)?)),
        ScalarKind::Double => Value::Double(f64_from_ordered(fixed(bytes)?)),
        ScalarKind::Decimal => Value::Decimal(decode_decimal(bytes)?),
        ScalarKind::Date => Value::Date(Date::from_millis(i64_from_ordered(fixed(bytes)?))),
        ScalarKind::Time => Value::Time(Time::from_millis(i64_from_ordered(fixed(bytes)?))),
        ScalarKind::Timestamp => {
            let millis = i64_from_ordered(fixed(bytes)?);
            let nanos = u32::from_be_bytes(
                read_array(bytes, 8, false).ok_or_else(|| short(kind, bytes.len()))?,
            );
            let ts = Timestamp::new(millis, nanos).ok_or_else(|| {
                InternalError::codec_illegal_data(format!("TIMESTAMP nanos {nanos} out of range"))
            })?;
            Value::Timestamp(ts)
        }
        ScalarKind::Varchar => {
            let raw = unescape(bytes)?;
            let text = String::from_utf8(raw).map_err(|err| {
                InternalError::codec_illegal_data(format!("VARCHAR payload is not UTF-8: {err}"))
            })?;
            Value::Varchar(text)
        }
        ScalarKind::Varbinary => Value::Varbinary(unescape(bytes)?),
    };

    Ok(value)
}

/// Encoded size of a native scalar value without encoding it.
pub(crate) fn scalar_encoded_len(kind: ScalarKind, value: &Value) -> usize {
    if value.is_null() {
        return 0;
    }
    if let Some(width) = kind.byte_width() {
        return width;
    }

    match value {
        Value::Decimal(v) => decimal_encoded_len(*v),
        Value::Varchar(v) => escaped_len(v.as_bytes()),
        Value::Varbinary(v) => escaped_len(v),
        other => other.to_string().len(),
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], InternalError> {
    read_array(bytes, 0, false).ok_or_else(|| InternalError::codec_illegal_data("short fixed-width window"))
}

fn short(kind: ScalarKind, len: usize) -> InternalError {
    InternalError::codec_illegal_data(format!("{kind} window too short: {len} bytes"))
}
