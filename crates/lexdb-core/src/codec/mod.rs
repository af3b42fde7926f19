//! Typed, order-preserving value codecs.
//!
//! Every SQL type is one `DataType` variant; the catalog facts live in
//! `lexdb_primitives`. Encodings compare byte-lexicographically exactly as
//! their native values compare, and descending encodings are the byte-wise
//! complement of ascending ones.

mod array;
mod bytes;
mod coerce;
mod decimal;
mod literal;
mod numeric;
mod ordered;
mod scalar;
mod sort_order;

#[cfg(test)]
mod tests;

use crate::{
    error::{ErrorOrigin, InternalError},
    obs::sink::{MetricsEvent, record},
    value::{Value, compare_values},
};
use lexdb_primitives::{ARRAY_TYPE_CODE_BASE, ScalarKind};
use std::{cmp::Ordering, fmt};

// re-exports
pub use array::{ARRAY_FORMAT_VERSION, ArrayCodec};
pub use coerce::{convert, is_kind_castable, is_kind_coercible};
pub use decimal::{MAX_DECIMAL_PRECISION, decimal_precision, set_decimal_width_and_scale};
pub use literal::reseed_sampling;
pub use numeric::NumericCodec;
pub use sort_order::{ASC_SEPARATOR, DESC_SEPARATOR, SortOrder, invert, invert_in_place};

pub(crate) use coerce::to_decimal;

///
/// TypeWidth
///
/// Declared width of a value: maximum length (precision for decimals) and
/// scale. `None` leaves that dimension unbounded.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TypeWidth {
    pub max_length: Option<u32>,
    pub scale: Option<u32>,
}

impl TypeWidth {
    pub const UNBOUNDED: Self = Self {
        max_length: None,
        scale: None,
    };

    #[must_use]
    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            max_length: Some(precision),
            scale: Some(scale),
        }
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        self.max_length.is_none() && self.scale.is_none()
    }
}

///
/// DataType
///
/// Immutable type descriptor; one variant per SQL scalar type plus arrays of
/// any scalar element type. Freely shared across threads.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DataType {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl DataType {
    pub const BOOLEAN: Self = Self::Scalar(ScalarKind::Boolean);
    pub const TINYINT: Self = Self::Scalar(ScalarKind::TinyInt);
    pub const SMALLINT: Self = Self::Scalar(ScalarKind::SmallInt);
    pub const INTEGER: Self = Self::Scalar(ScalarKind::Integer);
    pub const BIGINT: Self = Self::Scalar(ScalarKind::BigInt);
    pub const FLOAT: Self = Self::Scalar(ScalarKind::Float);
    pub const DOUBLE: Self = Self::Scalar(ScalarKind::Double);
    pub const DECIMAL: Self = Self::Scalar(ScalarKind::Decimal);
    pub const DATE: Self = Self::Scalar(ScalarKind::Date);
    pub const TIME: Self = Self::Scalar(ScalarKind::Time);
    pub const TIMESTAMP: Self = Self::Scalar(ScalarKind::Timestamp);
    pub const VARCHAR: Self = Self::Scalar(ScalarKind::Varchar);
    pub const VARBINARY: Self = Self::Scalar(ScalarKind::Varbinary);

    /// Look a type up by SQL name; `"<ELEMENT> ARRAY"` names array types.
    #[must_use]
    pub fn from_sql_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let upper = name.to_ascii_uppercase();
        match upper.strip_suffix("ARRAY") {
            Some(element) => ScalarKind::from_sql_name(element).map(Self::Array),
            None => ScalarKind::from_sql_name(name).map(Self::Scalar),
        }
    }

    #[must_use]
    pub const fn from_sql_type_code(code: i32) -> Option<Self> {
        if code >= ARRAY_TYPE_CODE_BASE - 100 {
            match ScalarKind::from_sql_type_code(code - ARRAY_TYPE_CODE_BASE) {
                Some(kind) => Some(Self::Array(kind)),
                None => None,
            }
        } else {
            match ScalarKind::from_sql_type_code(code) {
                Some(kind) => Some(Self::Scalar(kind)),
                None => None,
            }
        }
    }

    #[must_use]
    pub const fn sql_type_code(self) -> i32 {
        match self {
            Self::Scalar(kind) => kind.sql_type_code(),
            Self::Array(kind) => ARRAY_TYPE_CODE_BASE + kind.sql_type_code(),
        }
    }

    /// The scalar kind, or the element kind for arrays.
    #[must_use]
    pub const fn kind(self) -> ScalarKind {
        match self {
            Self::Scalar(kind) | Self::Array(kind) => kind,
        }
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array(_))
    }

    #[must_use]
    pub const fn is_fixed_width(self) -> bool {
        match self {
            Self::Scalar(kind) => kind.is_fixed_width(),
            Self::Array(_) => false,
        }
    }

    #[must_use]
    pub const fn byte_width(self) -> Option<usize> {
        match self {
            Self::Scalar(kind) => kind.byte_width(),
            Self::Array(_) => None,
        }
    }

    #[must_use]
    pub const fn is_date_like(self) -> bool {
        match self {
            Self::Scalar(kind) => kind.is_date_like(),
            Self::Array(_) => false,
        }
    }

    #[must_use]
    pub const fn is_coercible_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Scalar(from), Self::Scalar(to)) | (Self::Array(from), Self::Array(to)) => {
                is_kind_coercible(from, to)
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_castable_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Scalar(from), Self::Scalar(to)) | (Self::Array(from), Self::Array(to)) => {
                is_kind_castable(from, to)
            }
            (Self::Array(_), Self::Scalar(ScalarKind::Varchar)) => true,
            _ => false,
        }
    }

    /// Allocation-free numeric codec for integral, floating and temporal types.
    #[must_use]
    pub const fn codec(self) -> Option<NumericCodec> {
        match self {
            Self::Scalar(kind) => NumericCodec::for_kind(kind),
            Self::Array(_) => None,
        }
    }

    /// Encode `value` under `sort`; null encodes to zero bytes.
    pub fn encode(self, value: &Value, sort: SortOrder) -> Result<Vec<u8>, InternalError> {
        let mut out = Vec::with_capacity(self.estimate_byte_size(value));
        self.encode_into(value, sort, &mut out)?;

        Ok(out)
    }

    /// Append the encoding of `value` to `out`.
    ///
    /// A value of another type is converted first when castable. On error
    /// `out` is truncated back to its original length.
    pub fn encode_into(self, value: &Value, sort: SortOrder, out: &mut Vec<u8>) -> Result<(), InternalError> {
        let start = out.len();
        let result = self.encode_inner(value, sort, out);

        match &result {
            Ok(()) => record(MetricsEvent::ValueEncoded {
                data_type: self,
                bytes: (out.len() - start) as u64,
            }),
            Err(err) => {
                out.truncate(start);
                record_error(err);
            }
        }

        result
    }

    fn encode_inner(self, value: &Value, sort: SortOrder, out: &mut Vec<u8>) -> Result<(), InternalError> {
        let native = convert(value, self)?;

        match (self, &native) {
            (_, Value::Null) => Ok(()),
            (Self::Array(element), Value::Array(array)) => ArrayCodec::new(element).encode(array, sort, out),
            (Self::Scalar(kind), native) => {
                let start = out.len();
                scalar::encode_scalar(kind, native, out)?;
                sort.apply(kind, &mut out[start..]);
                Ok(())
            }
            (Self::Array(_), other) => Err(InternalError::codec_illegal_data(format!(
                "cannot encode {other} as {self}"
            ))),
        }
    }

    /// Decode `bytes`, encoded as `actual` under `sort`, into this type.
    ///
    /// Zero-length input is null. `actual` must be castable to this type;
    /// a declared decimal `scale` rounds the result.
    pub fn decode(
        self,
        bytes: &[u8],
        actual: Self,
        sort: SortOrder,
        width: TypeWidth,
    ) -> Result<Value, InternalError> {
        let result = self.decode_inner(bytes, actual, sort, width);

        match &result {
            Ok(_) => record(MetricsEvent::ValueDecoded {
                data_type: self,
                bytes: bytes.len() as u64,
            }),
            Err(err) => record_error(err),
        }

        result
    }

    fn decode_inner(
        self,
        bytes: &[u8],
        actual: Self,
        sort: SortOrder,
        width: TypeWidth,
    ) -> Result<Value, InternalError> {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        if !actual.is_castable_to(self) {
            return Err(InternalError::type_mismatch(ErrorOrigin::Codec, actual, self));
        }

        let native = match actual {
            Self::Scalar(kind) => {
                if sort.is_descending() {
                    let mut ascending = bytes.to_vec();
                    sort.apply(kind, &mut ascending);
                    scalar::decode_scalar(kind, &ascending)?
                } else {
                    scalar::decode_scalar(kind, bytes)?
                }
            }
            Self::Array(element) => Value::Array(ArrayCodec::new(element).decode(bytes, sort)?),
        };

        let converted = convert(&native, self)?;
        match (converted, width.scale) {
            (Value::Decimal(value), Some(_)) => {
                set_decimal_width_and_scale(value, None, width.scale)
                    .map(Value::Decimal)
                    .ok_or_else(|| {
                        InternalError::capacity_exceeded(
                            ErrorOrigin::Codec,
                            format!("value {value} does not fit scale {:?}", width.scale),
                        )
                    })
            }
            (converted, _) => Ok(converted),
        }
    }

    /// Decode `bytes` that were encoded as this very type.
    pub fn decode_native(self, bytes: &[u8], sort: SortOrder) -> Result<Value, InternalError> {
        self.decode(bytes, self, sort, TypeWidth::UNBOUNDED)
    }

    /// Compare `lhs` (of this type) with `rhs` (of `rhs_type`).
    ///
    /// Null orders before every non-null value. Operands of different types
    /// are compared after coercing one side to the other.
    pub fn compare(self, lhs: &Value, rhs: &Value, rhs_type: Self) -> Result<Ordering, InternalError> {
        match (lhs.is_null(), rhs.is_null()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }

        let common = self.common_type(rhs_type).ok_or_else(|| {
            InternalError::type_mismatch(ErrorOrigin::Codec, rhs_type, self)
        })?;
        let lhs = convert(lhs, common)?;
        let rhs = convert(rhs, common)?;

        compare_values(&lhs, &rhs).ok_or_else(|| {
            InternalError::codec_illegal_data(format!("values {lhs} and {rhs} are not comparable"))
        })
    }

    /// Type both sides of a comparison are converted to, if any.
    #[must_use]
    pub const fn common_type(self, other: Self) -> Option<Self> {
        if self.is_date_like() && other.is_date_like() {
            return Some(Self::TIMESTAMP);
        }
        if other.is_coercible_to(self) {
            Some(self)
        } else if self.is_coercible_to(other) {
            Some(other)
        } else {
            None
        }
    }

    /// Encoded size of `value` under this type.
    #[must_use]
    pub fn estimate_byte_size(self, value: &Value) -> usize {
        match (self, value) {
            (_, Value::Null) => 0,
            (Self::Array(element), Value::Array(array)) => ArrayCodec::new(element).estimate_byte_size(array),
            (Self::Scalar(kind), value) => scalar::scalar_encoded_len(kind, value),
            (Self::Array(_), _) => 0,
        }
    }

    /// Parse SQL literal text into a value of this type.
    pub fn parse_literal(self, text: &str) -> Result<Value, InternalError> {
        literal::parse_literal(self, text)
    }

    /// Random non-null value of this type from the calling thread's sampler.
    #[must_use]
    pub fn sample_value(self, max_length: Option<usize>, array_length: Option<usize>) -> Value {
        literal::sample_value(self, max_length, array_length)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Array(kind) => write!(f, "{kind} ARRAY"),
        }
    }
}

impl From<ScalarKind> for DataType {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

fn record_error(err: &InternalError) {
    record(MetricsEvent::CodecError {
        origin: err.origin,
        class: err.class,
    });
}
