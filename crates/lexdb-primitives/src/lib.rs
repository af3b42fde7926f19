//! Static scalar catalog shared by every lexdb layer.
//!
//! Each SQL scalar type has exactly one `ScalarKind` and one immutable
//! `ScalarMetadata` row. Codecs and expression builders consult this table;
//! nothing here is ever mutated at runtime.

#[macro_use]
mod macros;

use std::fmt;

/// Offset added to an element type's SQL code to form its array type code.
pub const ARRAY_TYPE_CODE_BASE: i32 = 3000;

///
/// ScalarKind
///
/// Canonical scalar SQL type identity.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScalarKind {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Timestamp,
    Varchar,
    Varbinary,
}

impl ScalarKind {
    /// Return the full metadata descriptor for one scalar kind.
    #[must_use]
    pub const fn metadata(self) -> ScalarMetadata {
        scalar_kind_registry!(metadata_from_registry, self)
    }

    /// Look a scalar kind up by its JDBC type code.
    #[must_use]
    pub const fn from_sql_type_code(code: i32) -> Option<Self> {
        scalar_kind_registry!(kind_from_sql_type_code_registry, code)
    }

    /// Look a scalar kind up by SQL name (case-insensitive).
    #[must_use]
    pub fn from_sql_name(name: &str) -> Option<Self> {
        ALL_SCALAR_KINDS
            .iter()
            .copied()
            .find(|kind| kind.sql_name().eq_ignore_ascii_case(name.trim()))
    }

    #[must_use]
    pub const fn family(self) -> ScalarFamily {
        self.metadata().family
    }

    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        self.metadata().sql_name
    }

    #[must_use]
    pub const fn sql_type_code(self) -> i32 {
        self.metadata().sql_type_code
    }

    /// Encoded width in bytes, or `None` for variable-width kinds.
    #[must_use]
    pub const fn byte_width(self) -> Option<usize> {
        self.metadata().byte_width
    }

    #[must_use]
    pub const fn is_fixed_width(self) -> bool {
        self.metadata().byte_width.is_some()
    }

    /// Return whether values of this kind are instants coercible to DATE.
    #[must_use]
    pub const fn is_date_like(self) -> bool {
        self.metadata().is_date_like
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self.family(),
            ScalarFamily::Integral | ScalarFamily::Floating | ScalarFamily::Decimal
        )
    }

    /// Decimal digits needed for any value of an integral kind.
    #[must_use]
    pub const fn integral_precision(self) -> Option<u32> {
        match self {
            Self::TinyInt => Some(3),
            Self::SmallInt => Some(5),
            Self::Integer => Some(10),
            Self::BigInt => Some(19),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

///
/// ScalarMetadata
///
/// Static per-kind facts shared across codec and expression layers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScalarMetadata {
    pub family: ScalarFamily,
    pub sql_name: &'static str,
    pub sql_type_code: i32,
    pub byte_width: Option<usize>,
    pub is_date_like: bool,
}

///
/// ScalarFamily
///
/// Coarse routing family used by coercion and arithmetic domain selection.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarFamily {
    Boolean,
    Integral,
    Floating,
    Decimal,
    Temporal,
    Textual,
    Binary,
}

/// Ordered list of all scalar kinds in registry order.
pub const ALL_SCALAR_KINDS: [ScalarKind; 13] = scalar_kind_registry!(all_kinds_from_registry);

///
/// TESTS
///
