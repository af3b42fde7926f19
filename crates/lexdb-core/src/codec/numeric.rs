use crate::{
    codec::{
        SortOrder,
        ordered::{
            f32_from_ordered, f64_from_ordered, i8_from_ordered, i16_from_ordered,
            i32_from_ordered, i64_from_ordered, ordered_f32_bytes, ordered_f64_bytes,
            ordered_i8_bytes, ordered_i16_bytes, ordered_i32_bytes, ordered_i64_bytes, read_array,
            write_array,
        },
    },
    error::{ErrorOrigin, InternalError},
};
use lexdb_primitives::ScalarKind;

///
/// NumericCodec
///
/// Allocation-free encode/decode of native numbers against caller-owned
/// buffers at a caller-chosen offset. Available for integral, floating and
/// temporal kinds; temporal kinds carry epoch milliseconds.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NumericCodec {
    kind: ScalarKind,
}

impl NumericCodec {
    /// Return the codec for `kind`, if it stores a native number.
    #[must_use]
    pub const fn for_kind(kind: ScalarKind) -> Option<Self> {
        match kind {
            ScalarKind::TinyInt
            | ScalarKind::SmallInt
            | ScalarKind::Integer
            | ScalarKind::BigInt
            | ScalarKind::Float
            | ScalarKind::Double
            | ScalarKind::Date
            | ScalarKind::Time
            | ScalarKind::Timestamp => Some(Self { kind }),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind(self) -> ScalarKind {
        self.kind
    }

    /// Bytes written by every `encode_*` call.
    #[must_use]
    pub const fn width(self) -> usize {
        match self.kind.byte_width() {
            Some(width) => width,
            None => 0,
        }
    }

    /// Decode the value at `offset` as an `i64`.
    ///
    /// Floating kinds truncate toward zero.
    pub fn decode_long(self, bytes: &[u8], offset: usize, sort: SortOrder) -> Result<i64, InternalError> {
        let desc = sort.is_descending();
        let value = match self.kind {
            ScalarKind::TinyInt => read(bytes, offset, desc).map(|b| i64::from(i8_from_ordered(b))),
            ScalarKind::SmallInt => read(bytes, offset, desc).map(|b| i64::from(i16_from_ordered(b))),
            ScalarKind::Integer => read(bytes, offset, desc).map(|b| i64::from(i32_from_ordered(b))),
            ScalarKind::BigInt | ScalarKind::Date | ScalarKind::Time | ScalarKind::Timestamp => {
                read(bytes, offset, desc).map(i64_from_ordered)
            }
            ScalarKind::Float => {
                read(bytes, offset, desc).map(|b| truncate_to_i64(f64::from(f32_from_ordered(b))))
            }
            ScalarKind::Double => read(bytes, offset, desc).map(|b| truncate_to_i64(f64_from_ordered(b))),
            _ => None,
        };

        value.ok_or_else(|| self.short_buffer(bytes.len(), offset))
    }

    /// Encode `value` at `offset`; narrowing kinds reject out-of-range input.
    #[allow(clippy::cast_precision_loss)]
    pub fn encode_long(
        self,
        value: i64,
        out: &mut [u8],
        offset: usize,
        sort: SortOrder,
    ) -> Result<usize, InternalError> {
        let desc = sort.is_descending();
        let written = match self.kind {
            ScalarKind::TinyInt => {
                let narrow = i8::try_from(value).map_err(|_| self.out_of_range(value))?;
                write_array(out, offset, ordered_i8_bytes(narrow), desc)
            }
            ScalarKind::SmallInt => {
                let narrow = i16::try_from(value).map_err(|_| self.out_of_range(value))?;
                write_array(out, offset, ordered_i16_bytes(narrow), desc)
            }
            ScalarKind::Integer => {
                let narrow = i32::try_from(value).map_err(|_| self.out_of_range(value))?;
                write_array(out, offset, ordered_i32_bytes(narrow), desc)
            }
            ScalarKind::BigInt | ScalarKind::Date | ScalarKind::Time => {
                write_array(out, offset, ordered_i64_bytes(value), desc)
            }
            ScalarKind::Timestamp => write_array(out, offset, ordered_i64_bytes(value), desc)
                .and_then(|()| write_array(out, offset + 8, 0u32.to_be_bytes(), desc)),
            ScalarKind::Float => write_array(out, offset, ordered_f32_bytes(value as f32), desc),
            ScalarKind::Double => write_array(out, offset, ordered_f64_bytes(value as f64), desc),
            _ => None,
        };

        written
            .map(|()| self.width())
            .ok_or_else(|| self.short_buffer(out.len(), offset))
    }

    pub fn decode_int(self, bytes: &[u8], offset: usize, sort: SortOrder) -> Result<i32, InternalError> {
        let value = self.decode_long(bytes, offset, sort)?;

        i32::try_from(value).map_err(|_| {
            InternalError::capacity_exceeded(
                ErrorOrigin::Codec,
                format!("{} value {value} does not fit INTEGER", self.kind),
            )
        })
    }

    pub fn encode_int(
        self,
        value: i32,
        out: &mut [u8],
        offset: usize,
        sort: SortOrder,
    ) -> Result<usize, InternalError> {
        self.encode_long(i64::from(value), out, offset, sort)
    }

    /// Decode the value at `offset` as an `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn decode_double(self, bytes: &[u8], offset: usize, sort: SortOrder) -> Result<f64, InternalError> {
        let desc = sort.is_descending();
        match self.kind {
            ScalarKind::Float => read(bytes, offset, desc)
                .map(|b| f64::from(f32_from_ordered(b)))
                .ok_or_else(|| self.short_buffer(bytes.len(), offset)),
            ScalarKind::Double => read(bytes, offset, desc)
                .map(f64_from_ordered)
                .ok_or_else(|| self.short_buffer(bytes.len(), offset)),
            _ => self.decode_long(bytes, offset, sort).map(|value| value as f64),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_double(
        self,
        value: f64,
        out: &mut [u8],
        offset: usize,
        sort: SortOrder,
    ) -> Result<usize, InternalError> {
        let desc = sort.is_descending();
        let written = match self.kind {
            ScalarKind::Float => write_array(out, offset, ordered_f32_bytes(value as f32), desc),
            ScalarKind::Double => write_array(out, offset, ordered_f64_bytes(value), desc),
            _ => {
                if !value.is_finite() {
                    return Err(InternalError::illegal_data(
                        ErrorOrigin::Codec,
                        format!("non-finite value {value} cannot be stored as {}", self.kind),
                    ));
                }
                return self.encode_long(truncate_to_i64(value), out, offset, sort);
            }
        };

        written
            .map(|()| self.width())
            .ok_or_else(|| self.short_buffer(out.len(), offset))
    }

    fn short_buffer(self, len: usize, offset: usize) -> InternalError {
        InternalError::codec_illegal_data(format!(
            "{} needs {} bytes at offset {offset}, buffer holds {len}",
            self.kind,
            self.width()
        ))
    }

    fn out_of_range(self, value: i64) -> InternalError {
        InternalError::capacity_exceeded(
            ErrorOrigin::Codec,
            format!("value {value} does not fit {}", self.kind),
        )
    }
}

fn read<const N: usize>(bytes: &[u8], offset: usize, desc: bool) -> Option<[u8; N]> {
    read_array(bytes, offset, desc)
}

#[allow(clippy::cast_possible_truncation)]
const fn truncate_to_i64(value: f64) -> i64 {
    // saturating float-to-int conversion
    value as i64
}
