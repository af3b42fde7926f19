use crate::{
    codec::{DataType, SortOrder},
    error::{ErrorOrigin, InternalError},
    value::Value,
};

///
/// KeyField
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct KeyField {
    pub data_type: DataType,
    pub sort_order: SortOrder,
}

impl KeyField {
    #[must_use]
    pub const fn new(data_type: DataType, sort_order: SortOrder) -> Self {
        Self {
            data_type,
            sort_order,
        }
    }

    #[must_use]
    pub const fn asc(data_type: DataType) -> Self {
        Self::new(data_type, SortOrder::Ascending)
    }

    #[must_use]
    pub const fn desc(data_type: DataType) -> Self {
        Self::new(data_type, SortOrder::Descending)
    }
}

///
/// KeySchema
///
/// Field layout of a composite row key. Splits keys produced by
/// `CompositeKeyCodec` back into per-field windows.
///
/// A single-field key is the raw field encoding with no framing. A key may
/// stop early: a variable-width field without a separator takes
/// the rest of the key, and every field after the last byte reads as null.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySchema {
    fields: Vec<KeyField>,
}

impl KeySchema {
    pub fn new(fields: impl IntoIterator<Item = KeyField>) -> Result<Self, InternalError> {
        let fields: Vec<_> = fields.into_iter().collect();
        if let Some(field) = fields.iter().find(|field| field.data_type.is_array()) {
            return Err(InternalError::constraint_violation(
                ErrorOrigin::Key,
                format!("{} cannot be a composite key field", field.data_type),
            ));
        }

        Ok(Self { fields })
    }

    #[must_use]
    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Split `key` into one byte window per field.
    pub fn split<'a>(&self, key: &'a [u8]) -> Result<Vec<&'a [u8]>, InternalError> {
        let mut windows = Vec::with_capacity(self.fields.len());
        let mut rest = key;
        let last = self.fields.len().saturating_sub(1);
        let single = self.fields.len() == 1;

        for (position, field) in self.fields.iter().enumerate() {
            let (window, tail) = split_field(*field, rest, position == last, single, position)?;
            windows.push(window);
            rest = tail;
        }

        if !rest.is_empty() {
            return Err(InternalError::structural_key(format!(
                "{} trailing bytes after the last key field",
                rest.len()
            )));
        }

        Ok(windows)
    }

    /// Window of the field at `position`.
    pub fn field<'a>(&self, key: &'a [u8], position: usize) -> Result<&'a [u8], InternalError> {
        if position >= self.fields.len() {
            return Err(InternalError::structural_key(format!(
                "key field {position} out of range for {} fields",
                self.fields.len()
            )));
        }

        let mut rest = key;
        let last = self.fields.len() - 1;
        let single = self.fields.len() == 1;
        for (index, field) in self.fields.iter().enumerate().take(position + 1) {
            let (window, tail) = split_field(*field, rest, index == last, single, index)?;
            if index == position {
                return Ok(window);
            }
            rest = tail;
        }

        Ok(&[])
    }

    /// Decode every field of `key`.
    pub fn decode(&self, key: &[u8]) -> Result<Vec<Value>, InternalError> {
        self.split(key)?
            .into_iter()
            .zip(&self.fields)
            .map(|(window, field)| field.data_type.decode_native(window, field.sort_order))
            .collect()
    }
}

// (window, remainder); a single-field key holds the raw field bytes
fn split_field(
    field: KeyField,
    rest: &[u8],
    terminal: bool,
    single: bool,
    position: usize,
) -> Result<(&[u8], &[u8]), InternalError> {
    if rest.is_empty() {
        return Ok((rest, rest));
    }

    if let Some(width) = field.data_type.byte_width() {
        if rest.len() < width {
            return Err(InternalError::structural_key(format!(
                "key field {position} ({}) needs {width} bytes, {} remain",
                field.data_type,
                rest.len()
            )));
        }
        return Ok(rest.split_at(width));
    }

    if single {
        return Ok((rest, &[]));
    }

    let separator = field.sort_order.separator();
    if terminal {
        return match field.sort_order {
            SortOrder::Ascending => Ok((rest, &[])),
            SortOrder::Descending => match rest.split_last() {
                Some((&last, window)) if last == separator => Ok((window, &[])),
                _ => Err(InternalError::structural_key(format!(
                    "descending key field {position} is missing its terminator"
                ))),
            },
        };
    }

    match rest.iter().position(|&byte| byte == separator) {
        Some(end) => Ok((&rest[..end], &rest[end + 1..])),
        None => Ok((rest, &[])),
    }
}
