//! Module: codec::array
//! Responsibility: homogeneous element sequences with random element access.
//! Does not own: scalar payload layout.
//! Boundary: `DataType::Array` routes through `ArrayCodec`.

use crate::{
    codec::{
        DataType, SortOrder,
        coerce::convert,
        scalar::{decode_scalar, encode_scalar, scalar_encoded_len},
    },
    error::{ErrorOrigin, InternalError},
    value::{ArrayValue, Value},
};
use lexdb_primitives::ScalarKind;

/// Format version written as the last byte of a variable-width array.
pub const ARRAY_FORMAT_VERSION: u8 = 0x01;

const OFFSET_BYTES: usize = 4;
const COUNT_BYTES: usize = 4;
const VERSION_BYTES: usize = 1;

///
/// ArrayCodec
///
/// Fixed-width element arrays are a plain concatenation of element
/// encodings. Variable-width element arrays write each element followed by
/// its separator, then a trailer of element start offsets, the element count
/// and the format version. The trailer is never inverted.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArrayCodec {
    element: ScalarKind,
}

impl ArrayCodec {
    #[must_use]
    pub const fn new(element: ScalarKind) -> Self {
        Self { element }
    }

    #[must_use]
    pub const fn element(self) -> ScalarKind {
        self.element
    }

    /// Append the encoding of `array`; an empty array encodes as null.
    pub fn encode(self, array: &ArrayValue, sort: SortOrder, out: &mut Vec<u8>) -> Result<(), InternalError> {
        if array.is_empty() {
            return Ok(());
        }

        let target = DataType::Scalar(self.element);
        let start = out.len();

        if let Some(width) = self.element.byte_width() {
            out.reserve(width * array.len());
            for (index, element) in array.elements().iter().enumerate() {
                if element.is_null() {
                    return Err(InternalError::illegal_data(
                        ErrorOrigin::Array,
                        format!("null element at index {index} in fixed-width {} array", self.element),
                    ));
                }
                let native = convert(element, target)?;
                let element_start = out.len();
                encode_scalar(self.element, &native, out)?;
                sort.apply(self.element, &mut out[element_start..]);
            }

            return Ok(());
        }

        let mut offsets = Vec::with_capacity(array.len());
        for element in array.elements() {
            offsets.push(to_u32(out.len() - start)?);
            let native = convert(element, target)?;
            let element_start = out.len();
            encode_scalar(self.element, &native, out)?;
            sort.apply(self.element, &mut out[element_start..]);
            out.push(sort.separator());
        }

        for offset in &offsets {
            out.extend_from_slice(&offset.to_be_bytes());
        }
        out.extend_from_slice(&to_u32(offsets.len())?.to_be_bytes());
        out.push(ARRAY_FORMAT_VERSION);

        Ok(())
    }

    /// Number of elements in an encoded array.
    pub fn len(self, bytes: &[u8]) -> Result<usize, InternalError> {
        if bytes.is_empty() {
            return Ok(0);
        }

        match self.element.byte_width() {
            Some(width) => {
                if !bytes.len().is_multiple_of(width) {
                    return Err(InternalError::illegal_data(
                        ErrorOrigin::Array,
                        format!(
                            "{} array length {} is not a multiple of {width}",
                            self.element,
                            bytes.len()
                        ),
                    ));
                }
                Ok(bytes.len() / width)
            }
            None => Ok(Trailer::parse(bytes)?.count),
        }
    }

    /// Return element `index`'s encoded window without decoding the array.
    ///
    /// `None` when `index` is past the end; an empty window is a null element.
    pub fn element_at(self, bytes: &[u8], index: usize) -> Result<Option<&[u8]>, InternalError> {
        if index >= self.len(bytes)? {
            return Ok(None);
        }

        if let Some(width) = self.element.byte_width() {
            let start = index * width;
            return Ok(bytes.get(start..start + width));
        }

        let trailer = Trailer::parse(bytes)?;
        let (start, end) = trailer.element_bounds(bytes, index)?;

        Ok(bytes.get(start..end))
    }

    /// Decode every element.
    pub fn decode(self, bytes: &[u8], sort: SortOrder) -> Result<ArrayValue, InternalError> {
        let len = self.len(bytes)?;
        let mut elements = Vec::with_capacity(len);
        let mut scratch = Vec::new();

        for index in 0..len {
            let window = self.element_at(bytes, index)?.unwrap_or_default();
            if window.is_empty() {
                elements.push(Value::Null);
                continue;
            }
            scratch.clear();
            scratch.extend_from_slice(window);
            sort.apply(self.element, &mut scratch);
            elements.push(decode_scalar(self.element, &scratch)?);
        }

        Ok(ArrayValue::new(self.element, elements))
    }

    /// Encoded size of `array` without encoding it.
    #[must_use]
    pub fn estimate_byte_size(self, array: &ArrayValue) -> usize {
        if array.is_empty() {
            return 0;
        }
        if let Some(width) = self.element.byte_width() {
            return width * array.len();
        }

        let payload: usize = array
            .elements()
            .iter()
            .map(|element| scalar_encoded_len(self.element, element) + 1)
            .sum();

        payload + OFFSET_BYTES * array.len() + COUNT_BYTES + VERSION_BYTES
    }
}

///
/// Trailer
///

struct Trailer {
    count: usize,
    offsets_start: usize,
}

impl Trailer {
    fn parse(bytes: &[u8]) -> Result<Self, InternalError> {
        let Some((&version, body)) = bytes.split_last() else {
            return Err(malformed("missing trailer"));
        };
        if version != ARRAY_FORMAT_VERSION {
            return Err(malformed(&format!("unsupported format version 0x{version:02x}")));
        }

        let count_start = body
            .len()
            .checked_sub(COUNT_BYTES)
            .ok_or_else(|| malformed("missing element count"))?;
        let count = read_u32(body, count_start)?;
        let offsets_start = count
            .checked_mul(OFFSET_BYTES)
            .and_then(|len| count_start.checked_sub(len))
            .ok_or_else(|| malformed("offset table exceeds array length"))?;

        Ok(Self { count, offsets_start })
    }

    // Element window excludes the separator byte that follows it.
    fn element_bounds(&self, bytes: &[u8], index: usize) -> Result<(usize, usize), InternalError> {
        let start = read_u32(bytes, self.offsets_start + index * OFFSET_BYTES)?;
        let next = if index + 1 < self.count {
            read_u32(bytes, self.offsets_start + (index + 1) * OFFSET_BYTES)?
        } else {
            self.offsets_start
        };

        let end = next
            .checked_sub(1)
            .filter(|&end| end >= start && next <= self.offsets_start)
            .ok_or_else(|| malformed(&format!("invalid bounds for element {index}")))?;

        Ok((start, end))
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Result<usize, InternalError> {
    let window = bytes
        .get(at..at + OFFSET_BYTES)
        .ok_or_else(|| malformed("truncated trailer"))?;
    let mut raw = [0u8; OFFSET_BYTES];
    raw.copy_from_slice(window);

    usize::try_from(u32::from_be_bytes(raw)).map_err(|_| malformed("offset overflow"))
}

fn to_u32(value: usize) -> Result<u32, InternalError> {
    u32::try_from(value).map_err(|_| {
        InternalError::capacity_exceeded(ErrorOrigin::Array, format!("array offset {value} exceeds u32"))
    })
}

fn malformed(detail: &str) -> InternalError {
    InternalError::illegal_data(ErrorOrigin::Array, format!("malformed array: {detail}"))
}
