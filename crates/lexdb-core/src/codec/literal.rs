//! Module: codec::literal
//! Responsibility: text-to-value parsing and sample value generation.
//! Does not own: encoding.
//! Boundary: sampling state is thread-local; descriptors stay immutable.

use crate::{
    codec::DataType,
    error::{ErrorOrigin, InternalError},
    types::{Date, Decimal, Time, Timestamp},
    value::{ArrayValue, Value},
};
use lexdb_primitives::ScalarKind;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{RngCore, SeedableRng},
};
use std::{
    cell::RefCell,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

const DEFAULT_SAMPLE_LENGTH: usize = 16;
const DEFAULT_SAMPLE_ARRAY_LENGTH: usize = 4;
// roughly 1940..2100 in epoch milliseconds
const SAMPLE_MILLIS_SPAN: u64 = 5_000_000_000_000;
const SAMPLE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

static SAMPLE_SEED: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static SAMPLE_RNG: RefCell<ChaCha8Rng> =
        RefCell::new(ChaCha8Rng::seed_from_u64(SAMPLE_SEED.load(Ordering::Relaxed)));
}

/// Set the sampling seed for threads that have not sampled yet, and reseed
/// the calling thread.
pub fn reseed_sampling(seed: u64) {
    SAMPLE_SEED.store(seed, Ordering::Relaxed);
    SAMPLE_RNG.with(|rng| *rng.borrow_mut() = ChaCha8Rng::seed_from_u64(seed));
}

/// Parse SQL literal text into a value of `data_type`.
///
/// Empty text and the keyword `null` parse to null. Array literals are
/// bracketed, comma-separated element literals.
pub(crate) fn parse_literal(data_type: DataType, text: &str) -> Result<Value, InternalError> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Scalar(kind) => parse_scalar(kind, text),
        DataType::Array(element) => {
            let inner = text
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| invalid(data_type, text))?;
            let elements = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner
                    .split(',')
                    .map(|part| parse_scalar_or_null(element, part))
                    .collect::<Result<Vec<_>, _>>()?
            };

            Ok(Value::Array(ArrayValue::new(element, elements)))
        }
    }
}

fn parse_scalar_or_null(kind: ScalarKind, text: &str) -> Result<Value, InternalError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }

    parse_scalar(kind, text)
}

fn parse_scalar(kind: ScalarKind, text: &str) -> Result<Value, InternalError> {
    let data_type = DataType::Scalar(kind);
    let parsed = match kind {
        ScalarKind::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        ScalarKind::TinyInt => text.parse().ok().map(Value::TinyInt),
        ScalarKind::SmallInt => text.parse().ok().map(Value::SmallInt),
        ScalarKind::Integer => text.parse().ok().map(Value::Integer),
        ScalarKind::BigInt => text.parse().ok().map(Value::BigInt),
        ScalarKind::Float => text.parse().ok().map(Value::Float),
        ScalarKind::Double => text.parse().ok().map(Value::Double),
        ScalarKind::Decimal => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .map(Value::Decimal),
        ScalarKind::Date => Date::parse(text).map(Value::Date),
        ScalarKind::Time => Time::parse(text).map(Value::Time),
        ScalarKind::Timestamp => Timestamp::parse(text).map(Value::Timestamp),
        ScalarKind::Varchar => Some(Value::Varchar(text.to_string())),
        ScalarKind::Varbinary => parse_hex(text).map(Value::Varbinary),
    };

    parsed.ok_or_else(|| invalid(data_type, text))
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if !text.len().is_multiple_of(2) {
        return None;
    }

    (0..text.len())
        .step_by(2)
        .map(|at| text.get(at..at + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

fn invalid(data_type: DataType, text: &str) -> InternalError {
    InternalError::illegal_data(
        ErrorOrigin::Codec,
        format!("'{text}' is not a valid {data_type} literal"),
    )
}

/// Produce a random value of `data_type` from the calling thread's sampler.
///
/// `max_length` bounds textual/binary payloads, `array_length` the element
/// count of arrays. Samples are never null.
#[must_use]
pub(crate) fn sample_value(data_type: DataType, max_length: Option<usize>, array_length: Option<usize>) -> Value {
    SAMPLE_RNG.with(|rng| {
        let rng = &mut *rng.borrow_mut();
        match data_type {
            DataType::Scalar(kind) => sample_scalar(rng, kind, max_length),
            DataType::Array(element) => {
                let len = array_length.unwrap_or(DEFAULT_SAMPLE_ARRAY_LENGTH).max(1);
                let elements = (0..len)
                    .map(|_| sample_scalar(rng, element, max_length))
                    .collect();
                Value::Array(ArrayValue::new(element, elements))
            }
        }
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn sample_scalar(rng: &mut ChaCha8Rng, kind: ScalarKind, max_length: Option<usize>) -> Value {
    match kind {
        ScalarKind::Boolean => Value::Boolean(rng.next_u32() & 1 == 1),
        ScalarKind::TinyInt => Value::TinyInt(rng.next_u32() as i8),
        ScalarKind::SmallInt => Value::SmallInt(rng.next_u32() as i16),
        ScalarKind::Integer => Value::Integer(rng.next_u32() as i32),
        ScalarKind::BigInt => Value::BigInt(rng.next_u64() as i64),
        ScalarKind::Float => Value::Float(unit_interval(rng) as f32 * 1_000.0),
        ScalarKind::Double => Value::Double(unit_interval(rng) * 1_000_000.0),
        ScalarKind::Decimal => {
            Value::Decimal(Decimal::new(i64::from(rng.next_u32() as i32), rng.next_u32() % 5))
        }
        ScalarKind::Date => Value::Date(Date::from_millis(sample_millis(rng))),
        ScalarKind::Time => Value::Time(Time::from_millis(sample_millis(rng))),
        ScalarKind::Timestamp => {
            let nanos = rng.next_u32() % 1_000_000;
            Value::Timestamp(
                Timestamp::new(sample_millis(rng), nanos).unwrap_or_else(|| Timestamp::from_millis(0)),
            )
        }
        ScalarKind::Varchar => {
            let len = sample_len(rng, max_length);
            let text = (0..len)
                .map(|_| char::from(SAMPLE_ALPHABET[rng.next_u32() as usize % SAMPLE_ALPHABET.len()]))
                .collect();
            Value::Varchar(text)
        }
        ScalarKind::Varbinary => {
            let mut bytes = vec![0u8; sample_len(rng, max_length)];
            rng.fill_bytes(&mut bytes);
            Value::Varbinary(bytes)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn unit_interval(rng: &mut ChaCha8Rng) -> f64 {
    f64::from(rng.next_u32()) / f64::from(u32::MAX)
}

#[allow(clippy::cast_possible_wrap)]
fn sample_millis(rng: &mut ChaCha8Rng) -> i64 {
    (rng.next_u64() % SAMPLE_MILLIS_SPAN) as i64 - (SAMPLE_MILLIS_SPAN / 2) as i64
}

fn sample_len(rng: &mut ChaCha8Rng, max_length: Option<usize>) -> usize {
    let max = max_length.unwrap_or(DEFAULT_SAMPLE_LENGTH).max(1);

    1 + usize::try_from(rng.next_u32()).unwrap_or(0) % max
}
