//! Module: codec::decimal
//! Responsibility: order-preserving decimal payloads and width/scale fitting.
//! Does not own: sort-direction inversion.
//! Boundary: internal helper for the scalar codec and decimal arithmetic.

use crate::{error::InternalError, types::Decimal};
use rust_decimal::RoundingStrategy;

/// Largest precision the native decimal engine can represent.
pub const MAX_DECIMAL_PRECISION: u32 = 28;

const NEGATIVE_MARKER: u8 = 0x01;
const ZERO_MARKER: u8 = 0x02;
const POSITIVE_MARKER: u8 = 0x03;
const NEGATIVE_TERMINATOR: u8 = 0xFF;
const EXPONENT_BIAS: i32 = 0x40;
const DIGIT_BUFFER_LEN: usize = 39;

// Decimal ordering is sign bucket + exponent + significant digits
// (+ terminator for negatives, which are complemented after the marker).
pub(crate) fn push_decimal(out: &mut Vec<u8>, value: Decimal) -> Result<(), InternalError> {
    let normalized = value.normalize();
    if normalized.is_zero() {
        out.push(ZERO_MARKER);
        return Ok(());
    }

    let mut digits_buf = [0u8; DIGIT_BUFFER_LEN];
    let digit_len = write_decimal_digits(normalized.mantissa().unsigned_abs(), &mut digits_buf);
    let exponent = decimal_exponent(normalized.scale(), digit_len)?;
    let digits = &digits_buf[..digit_len];

    if normalized.is_sign_negative() {
        out.push(NEGATIVE_MARKER);
        out.push(!exponent);
        out.extend(digits.iter().map(|digit| !digit));
        out.push(NEGATIVE_TERMINATOR);
    } else {
        out.push(POSITIVE_MARKER);
        out.push(exponent);
        out.extend_from_slice(digits);
    }

    Ok(())
}

pub(crate) fn decode_decimal(bytes: &[u8]) -> Result<Decimal, InternalError> {
    let Some((&marker, rest)) = bytes.split_first() else {
        return Err(InternalError::codec_illegal_data("empty decimal payload"));
    };

    let (negative, exponent, digits): (bool, u8, Vec<u8>) = match marker {
        ZERO_MARKER if rest.is_empty() => return Ok(Decimal::ZERO),
        POSITIVE_MARKER => {
            let (&exponent, digits) = rest
                .split_first()
                .ok_or_else(|| InternalError::codec_illegal_data("decimal missing exponent"))?;
            (false, exponent, digits.to_vec())
        }
        NEGATIVE_MARKER => {
            let Some((&NEGATIVE_TERMINATOR, body)) = rest.split_last() else {
                return Err(InternalError::codec_illegal_data(
                    "negative decimal missing terminator",
                ));
            };
            let (&exponent, digits) = body
                .split_first()
                .ok_or_else(|| InternalError::codec_illegal_data("decimal missing exponent"))?;
            (true, !exponent, digits.iter().map(|digit| !digit).collect())
        }
        other => {
            return Err(InternalError::codec_illegal_data(format!(
                "invalid decimal marker 0x{other:02x}"
            )));
        }
    };

    if digits.is_empty() || digits.len() > DIGIT_BUFFER_LEN {
        return Err(InternalError::codec_illegal_data("invalid decimal digit count"));
    }

    let mut mantissa: i128 = 0;
    for digit in digits.iter().copied() {
        if !digit.is_ascii_digit() {
            return Err(InternalError::codec_illegal_data(format!(
                "invalid decimal digit 0x{digit:02x}"
            )));
        }
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(digit - b'0')))
            .ok_or_else(|| InternalError::codec_illegal_data("decimal mantissa overflow"))?;
    }

    // exponent = digits - 1 - scale
    let digit_count = i32::try_from(digits.len())
        .map_err(|_| InternalError::codec_illegal_data("invalid decimal digit count"))?;
    let mut scale = digit_count - 1 - (i32::from(exponent) - EXPONENT_BIAS);
    while scale < 0 {
        mantissa = mantissa
            .checked_mul(10)
            .ok_or_else(|| InternalError::codec_illegal_data("decimal mantissa overflow"))?;
        scale += 1;
    }

    if negative {
        mantissa = -mantissa;
    }

    let scale = u32::try_from(scale)
        .map_err(|_| InternalError::codec_illegal_data("invalid decimal scale"))?;

    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|err| InternalError::codec_illegal_data(format!("decimal out of range: {err}")))
}

/// Encoded payload length of a decimal value.
pub(crate) fn decimal_encoded_len(value: Decimal) -> usize {
    let normalized = value.normalize();
    if normalized.is_zero() {
        return 1;
    }

    let digits = digit_count(normalized.mantissa().unsigned_abs());
    if normalized.is_sign_negative() {
        digits + 3
    } else {
        digits + 2
    }
}

/// Total significant digits (precision) of a decimal value.
#[must_use]
pub fn decimal_precision(value: Decimal) -> u32 {
    let digits = u32::try_from(digit_count(value.mantissa().unsigned_abs())).unwrap_or(u32::MAX);

    digits.max(value.scale())
}

/// Round `value` to `scale` and verify it fits `DECIMAL(precision, scale)`.
///
/// Returns `None` when the integer part needs more than `precision - scale`
/// digits. A missing bound leaves that dimension unconstrained.
#[must_use]
pub fn set_decimal_width_and_scale(
    value: Decimal,
    precision: Option<u32>,
    scale: Option<u32>,
) -> Option<Decimal> {
    let value = match scale {
        Some(scale) if value.scale() > scale => {
            value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
        }
        _ => value,
    };

    if let Some(precision) = precision {
        let allowed_integer_digits = precision.saturating_sub(scale.unwrap_or(0));
        if integer_digits(value) > allowed_integer_digits {
            return None;
        }
    }

    Some(value)
}

fn integer_digits(value: Decimal) -> u32 {
    let whole = value.trunc().abs();
    if whole.is_zero() {
        return 0;
    }

    u32::try_from(digit_count(whole.mantissa().unsigned_abs()))
        .unwrap_or(u32::MAX)
        .saturating_sub(whole.scale())
}

fn decimal_exponent(scale: u32, digit_len: usize) -> Result<u8, InternalError> {
    let digits = i32::try_from(digit_len)
        .map_err(|_| InternalError::codec_illegal_data("decimal digit count overflow"))?;
    let scale = i32::try_from(scale)
        .map_err(|_| InternalError::codec_illegal_data("decimal scale overflow"))?;

    u8::try_from(digits - 1 - scale + EXPONENT_BIAS)
        .map_err(|_| InternalError::codec_illegal_data("decimal exponent overflow"))
}

fn digit_count(mut value: u128) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }

    count
}

fn write_decimal_digits(mut value: u128, out: &mut [u8; DIGIT_BUFFER_LEN]) -> usize {
    let mut write_idx = DIGIT_BUFFER_LEN;

    loop {
        write_idx -= 1;
        // remainder is always in 0..=9
        out[write_idx] = b'0' + (value % 10) as u8;
        value /= 10;

        if value == 0 {
            break;
        }
    }

    let len = DIGIT_BUFFER_LEN - write_idx;
    out.copy_within(write_idx..DIGIT_BUFFER_LEN, 0);
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).expect("decimal literal")
    }

    fn encoded(value: Decimal) -> Vec<u8> {
        let mut out = Vec::new();
        push_decimal(&mut out, value).expect("decimal encodes");
        out
    }

    #[test]
    fn decimal_layout_matches_marker_exponent_digits() {
        assert_eq!(encoded(Decimal::ZERO), vec![0x02]);
        assert_eq!(encoded(dec("12.50")), vec![0x03, 0x41, b'1', b'2', b'5']);
        assert_eq!(encoded(dec("-1")), vec![0x01, !0x40, !b'1', 0xFF]);
    }

    #[test]
    fn decimal_encoding_never_contains_zero_byte() {
        for text in ["0.0000001", "-0.0000001", "79228162514264337593543950335", "-1e-28"] {
            let value = Decimal::from_scientific(text)
                .or_else(|_| Decimal::from_str(text))
                .expect("decimal literal");
            assert!(!encoded(value).contains(&0x00), "{text}");
        }
    }

    #[test]
    fn decimal_decode_restores_normalized_value() {
        for text in ["0", "1", "-1", "100", "0.001", "-123.456", "1000000.5"] {
            let value = dec(text);
            let decoded = decode_decimal(&encoded(value)).expect("decimal decodes");
            assert_eq!(decoded, value, "{text}");
            assert_eq!(decimal_encoded_len(value), encoded(value).len(), "{text}");
        }
    }

    #[test]
    fn set_width_rounds_and_rejects_overflow() {
        assert_eq!(
            set_decimal_width_and_scale(dec("1.235"), Some(5), Some(2)),
            Some(dec("1.24"))
        );
        assert_eq!(set_decimal_width_and_scale(dec("999.99"), Some(5), Some(2)), Some(dec("999.99")));
        assert_eq!(set_decimal_width_and_scale(dec("1000.00"), Some(5), Some(2)), None);
        assert_eq!(set_decimal_width_and_scale(dec("-0.5"), Some(1), Some(1)), Some(dec("-0.5")));
        assert_eq!(set_decimal_width_and_scale(dec("123456"), None, None), Some(dec("123456")));
    }

    #[test]
    fn precision_counts_significant_digits() {
        assert_eq!(decimal_precision(dec("123.45")), 5);
        assert_eq!(decimal_precision(dec("0.001")), 3);
        assert_eq!(decimal_precision(dec("7")), 1);
    }
}
