//! Module: codec::ordered
//! Responsibility: fixed-width scalar byte transforms preserving order.
//! Does not own: sort-direction inversion or separator framing.
//! Boundary: internal helpers for scalar and numeric codecs.

const I8_SIGN: u8 = 1 << 7;
const I16_SIGN: u16 = 1 << 15;
const I32_SIGN: u32 = 1 << 31;
const I64_SIGN: u64 = 1 << 63;

pub(crate) const fn ordered_i8_bytes(value: i8) -> [u8; 1] {
    [value.cast_unsigned() ^ I8_SIGN]
}

pub(crate) const fn i8_from_ordered(bytes: [u8; 1]) -> i8 {
    (bytes[0] ^ I8_SIGN).cast_signed()
}

pub(crate) const fn ordered_i16_bytes(value: i16) -> [u8; 2] {
    (value.cast_unsigned() ^ I16_SIGN).to_be_bytes()
}

pub(crate) const fn i16_from_ordered(bytes: [u8; 2]) -> i16 {
    (u16::from_be_bytes(bytes) ^ I16_SIGN).cast_signed()
}

pub(crate) const fn ordered_i32_bytes(value: i32) -> [u8; 4] {
    (value.cast_unsigned() ^ I32_SIGN).to_be_bytes()
}

pub(crate) const fn i32_from_ordered(bytes: [u8; 4]) -> i32 {
    (u32::from_be_bytes(bytes) ^ I32_SIGN).cast_signed()
}

pub(crate) const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    (value.cast_unsigned() ^ I64_SIGN).to_be_bytes()
}

pub(crate) const fn i64_from_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ I64_SIGN).cast_signed()
}

// Positive floats get the sign bit set; negative floats are fully complemented
// so larger magnitudes sort first.
pub(crate) const fn ordered_f32_bytes(value: f32) -> [u8; 4] {
    let bits = value.to_bits();
    let ordered = if bits & I32_SIGN == 0 {
        bits ^ I32_SIGN
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

pub(crate) const fn f32_from_ordered(bytes: [u8; 4]) -> f32 {
    let ordered = u32::from_be_bytes(bytes);
    let bits = if ordered & I32_SIGN == 0 {
        !ordered
    } else {
        ordered ^ I32_SIGN
    };

    f32::from_bits(bits)
}

pub(crate) const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & I64_SIGN == 0 {
        bits ^ I64_SIGN
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

pub(crate) const fn f64_from_ordered(bytes: [u8; 8]) -> f64 {
    let ordered = u64::from_be_bytes(bytes);
    let bits = if ordered & I64_SIGN == 0 {
        !ordered
    } else {
        ordered ^ I64_SIGN
    };

    f64::from_bits(bits)
}

/// Copy a fixed-size window out of `bytes`, mapping each byte through the
/// sort order back to its ascending form.
pub(crate) fn read_array<const N: usize>(
    bytes: &[u8],
    offset: usize,
    descending: bool,
) -> Option<[u8; N]> {
    let window = bytes.get(offset..offset.checked_add(N)?)?;
    let mut out = [0u8; N];
    for (slot, &byte) in out.iter_mut().zip(window) {
        *slot = if descending { !byte } else { byte };
    }

    Some(out)
}

/// Write a fixed-size ascending window into `out` at `offset`, applying the
/// sort order on the way.
pub(crate) fn write_array<const N: usize>(
    out: &mut [u8],
    offset: usize,
    bytes: [u8; N],
    descending: bool,
) -> Option<()> {
    let window = out.get_mut(offset..offset.checked_add(N)?)?;
    for (slot, byte) in window.iter_mut().zip(bytes) {
        *slot = if descending { !byte } else { byte };
    }

    Some(())
}
