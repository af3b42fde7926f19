use lexdb_primitives::ScalarKind;
use std::fmt;

const BOOLEAN_FLIP: u8 = 0x01;

/// Separator appended after an ascending variable-width key field.
pub const ASC_SEPARATOR: u8 = 0x00;

/// Separator appended after a descending variable-width key field.
pub const DESC_SEPARATOR: u8 = invert(ASC_SEPARATOR);

/// Complement a single encoded byte.
#[must_use]
pub const fn invert(byte: u8) -> u8 {
    !byte
}

/// Complement every byte of an encoded window in place.
pub fn invert_in_place(bytes: &mut [u8]) {
    for byte in bytes {
        *byte = invert(*byte);
    }
}

///
/// SortOrder
///
/// Direction an encoding must order under byte-lexicographic comparison.
/// Descending encodings are the byte-wise complement of ascending ones.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// Separator byte written after a non-terminal variable-width field.
    #[must_use]
    pub const fn separator(self) -> u8 {
        match self {
            Self::Ascending => ASC_SEPARATOR,
            Self::Descending => DESC_SEPARATOR,
        }
    }

    /// Map an encoded `kind` window between its ascending form and this
    /// order's form.
    ///
    /// The transform is an involution, so the same call converts both ways.
    /// Descending booleans swap `0x00` and `0x01` so that descending TRUE is
    /// ascending FALSE; every other kind is complemented byte-wise.
    pub fn apply(self, kind: ScalarKind, bytes: &mut [u8]) {
        if !self.is_descending() {
            return;
        }

        if matches!(kind, ScalarKind::Boolean) {
            for byte in bytes {
                *byte ^= BOOLEAN_FLIP;
            }
        } else {
            invert_in_place(bytes);
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        };
        f.write_str(label)
    }
}
