//! Module: key
//! Responsibility: composite row-key construction and raw-key row ordering.
//! Does not own: field encodings (codec) or expression evaluation (expr).
//! Boundary: keys are plain byte strings; row identity and order are
//! defined by key bytes, never by decoded values.

mod schema;


use crate::{
    config::KeyConfig,
    error::{ErrorOrigin, InternalError},
    expr::Expression,
    obs::sink::KeySpan,
    row::Row,
};
use derive_more::Deref;
use std::cmp::Ordering;

// re-exports
pub use schema::{KeyField, KeySchema};

///
/// CompositeKey
///
/// Concatenated field encodings in key order.
///

#[derive(Clone, Debug, Default, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CompositeKey(Vec<u8>);

impl CompositeKey {
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CompositeKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

///
/// CompositeKeyCodec
///
/// Builds one ordered key from a list of expressions:
///
/// - a single expression yields its raw encoding;
/// - a non-terminal variable-width field is followed by its sort order's
///   separator, fixed-width fields never are;
/// - a terminal descending variable-width field gets a trailing separator;
/// - a non-terminal fixed-width field may not be null.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompositeKeyCodec {
    max_key_bytes: usize,
}

impl CompositeKeyCodec {
    #[must_use]
    pub const fn new(config: &KeyConfig) -> Self {
        Self {
            max_key_bytes: config.max_key_bytes,
        }
    }

    pub fn concatenate(&self, row: &dyn Row, expressions: &[Expression]) -> Result<CompositeKey, InternalError> {
        let mut span = KeySpan::new(expressions.len());
        let key = self.build(row, expressions)?;
        span.finish(key.len());

        Ok(key)
    }

    fn build(&self, row: &dyn Row, expressions: &[Expression]) -> Result<CompositeKey, InternalError> {
        let mut out = Vec::new();

        match expressions {
            [] => {}
            [single] => {
                single.evaluate(row, &mut out)?;
            }
            _ => {
                let last = expressions.len() - 1;
                let mut value = Vec::new();

                for (position, expression) in expressions.iter().enumerate() {
                    let data_type = expression.data_type();
                    if data_type.is_array() {
                        return Err(InternalError::constraint_violation(
                            ErrorOrigin::Key,
                            format!("{data_type} cannot be a composite key field"),
                        ));
                    }

                    value.clear();
                    let produced = expression.evaluate(row, &mut value)?;

                    match data_type.byte_width() {
                        Some(width) if !produced && position < last => {
                            return Err(InternalError::structural_key(format!(
                                "non-terminal {data_type} key field {position} ({expression}) evaluated to null; \
                                 fixed-width fields must occupy {width} bytes"
                            )));
                        }
                        Some(width) if produced && value.len() != width => {
                            return Err(InternalError::structural_key(format!(
                                "{data_type} key field {position} produced {} bytes, expected {width}",
                                value.len()
                            )));
                        }
                        _ => {}
                    }

                    out.extend_from_slice(&value);

                    let sort_order = expression.sort_order();
                    if !data_type.is_fixed_width() && (position < last || sort_order.is_descending()) {
                        out.push(sort_order.separator());
                    }
                }
            }
        }

        if out.len() > self.max_key_bytes {
            return Err(InternalError::capacity_exceeded(
                ErrorOrigin::Key,
                format!("key of {} bytes exceeds the {} byte limit", out.len(), self.max_key_bytes),
            ));
        }

        Ok(CompositeKey(out))
    }
}

impl Default for CompositeKeyCodec {
    fn default() -> Self {
        Self::new(&KeyConfig::default())
    }
}

/// Whether two rows have identical keys.
#[must_use]
pub fn equals(a: &dyn Row, b: &dyn Row) -> bool {
    a.key() == b.key()
}

/// Order two rows by raw key bytes, skipping a shared prefix of `key_offset`
/// bytes. An offset past the end of a key leaves an empty window.
#[must_use]
pub fn compare(a: &dyn Row, b: &dyn Row, key_offset: usize) -> Ordering {
    fn window(key: &[u8], offset: usize) -> &[u8] {
        key.get(offset..).unwrap_or_default()
    }

    window(a.key(), key_offset).cmp(window(b.key(), key_offset))
}
