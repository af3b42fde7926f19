use crate::{
    codec::{DataType, SortOrder, TypeWidth},
    error::{ErrorOrigin, InternalError},
    key::{KeyField, KeySchema},
    row::Row,
};
use std::sync::Arc;

///
/// ColumnExpression
///
/// Reads one cell, addressed by (family, qualifier), as already-encoded bytes.
///

#[derive(Clone, Debug)]
pub struct ColumnExpression {
    family: Vec<u8>,
    qualifier: Vec<u8>,
    data_type: DataType,
    sort_order: SortOrder,
    width: TypeWidth,
}

impl ColumnExpression {
    pub fn new(family: impl AsRef<[u8]>, qualifier: impl AsRef<[u8]>, data_type: DataType) -> Self {
        Self {
            family: family.as_ref().to_vec(),
            qualifier: qualifier.as_ref().to_vec(),
            data_type,
            sort_order: SortOrder::Ascending,
            width: TypeWidth::UNBOUNDED,
        }
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Declared width; for decimals this bounds arithmetic results.
    #[must_use]
    pub fn with_width(mut self, width: TypeWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn family(&self) -> &[u8] {
        &self.family
    }

    #[must_use]
    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
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

    pub(crate) fn evaluate(&self, row: &dyn Row, out: &mut Vec<u8>) -> Result<bool, InternalError> {
        let Some(cell) = row.value_for(&self.family, &self.qualifier) else {
            return Ok(false);
        };

        copy_window(self.data_type, &cell.value, out)
    }
}

///
/// RowKeyColumnExpression
///
/// Reads one field of the row key through its `KeySchema`.
///

#[derive(Clone, Debug)]
pub struct RowKeyColumnExpression {
    schema: Arc<KeySchema>,
    position: usize,
    field: KeyField,
}

impl RowKeyColumnExpression {
    pub fn new(schema: Arc<KeySchema>, position: usize) -> Result<Self, InternalError> {
        let field = *schema.fields().get(position).ok_or_else(|| {
            InternalError::constraint_violation(
                ErrorOrigin::Expression,
                format!(
                    "row key has {} fields, position {position} does not exist",
                    schema.field_count()
                ),
            )
        })?;

        Ok(Self {
            schema,
            position,
            field,
        })
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.field.data_type
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.field.sort_order
    }

    pub(crate) fn evaluate(&self, row: &dyn Row, out: &mut Vec<u8>) -> Result<bool, InternalError> {
        let window = self.schema.field(row.key(), self.position)?;

        copy_window(self.field.data_type, window, out)
    }
}

// empty windows are null; fixed-width windows must match their width
fn copy_window(data_type: DataType, window: &[u8], out: &mut Vec<u8>) -> Result<bool, InternalError> {
    if window.is_empty() {
        return Ok(false);
    }
    if let Some(width) = data_type.byte_width()
        && window.len() != width
    {
        return Err(InternalError::illegal_data(
            ErrorOrigin::Expression,
            format!("{data_type} value must be {width} bytes, found {}", window.len()),
        ));
    }

    out.clear();
    out.extend_from_slice(window);

    Ok(true)
}
