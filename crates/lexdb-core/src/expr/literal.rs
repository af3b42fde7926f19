use crate::{
    codec::{DataType, SortOrder, TypeWidth, convert, decimal_precision},
    error::InternalError,
    value::Value,
};

///
/// LiteralExpression
///
/// Constant converted to its declared type and encoded once, at construction.
///

#[derive(Clone, Debug)]
pub struct LiteralExpression {
    value: Value,
    data_type: DataType,
    sort_order: SortOrder,
    width: TypeWidth,
    bytes: Vec<u8>,
}

impl LiteralExpression {
    pub fn new(value: Value, data_type: DataType, sort_order: SortOrder) -> Result<Self, InternalError> {
        let value = convert(&value, data_type)?;
        let bytes = data_type.encode(&value, sort_order)?;
        let width = literal_width(&value);

        Ok(Self {
            value,
            data_type,
            sort_order,
            width,
            bytes,
        })
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    #[must_use]
    pub const fn width(&self) -> TypeWidth {
        self.width
    }

    pub(crate) fn evaluate(&self, out: &mut Vec<u8>) -> bool {
        if self.bytes.is_empty() {
            return false;
        }
        out.clear();
        out.extend_from_slice(&self.bytes);

        true
    }
}

fn literal_width(value: &Value) -> TypeWidth {
    let max_length = match value {
        Value::Decimal(decimal) => return TypeWidth::decimal(decimal_precision(*decimal), decimal.scale()),
        Value::Varchar(text) => text.chars().count(),
        Value::Varbinary(bytes) => bytes.len(),
        _ => return TypeWidth::UNBOUNDED,
    };

    TypeWidth {
        max_length: u32::try_from(max_length).ok(),
        scale: None,
    }
}
