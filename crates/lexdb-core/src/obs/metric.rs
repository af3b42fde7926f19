use std::fmt;

///
/// MetricKind
///
/// Identity of one reported counter and how two readings of it combine.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MetricKind {
    ValuesEncoded,
    ValuesDecoded,
    BytesEncoded,
    BytesDecoded,
    ExpressionsEvaluated,
    ExpressionsNull,
    KeysBuilt,
    KeysFailed,
    KeyBytesTotal,
    KeyBytesMax,
    CodecErrors,
}

impl MetricKind {
    pub const ALL: [Self; 11] = [
        Self::ValuesEncoded,
        Self::ValuesDecoded,
        Self::BytesEncoded,
        Self::BytesDecoded,
        Self::ExpressionsEvaluated,
        Self::ExpressionsNull,
        Self::KeysBuilt,
        Self::KeysFailed,
        Self::KeyBytesTotal,
        Self::KeyBytesMax,
        Self::CodecErrors,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ValuesEncoded => "values_encoded",
            Self::ValuesDecoded => "values_decoded",
            Self::BytesEncoded => "bytes_encoded",
            Self::BytesDecoded => "bytes_decoded",
            Self::ExpressionsEvaluated => "expressions_evaluated",
            Self::ExpressionsNull => "expressions_null",
            Self::KeysBuilt => "keys_built",
            Self::KeysFailed => "keys_failed",
            Self::KeyBytesTotal => "key_bytes_total",
            Self::KeyBytesMax => "key_bytes_max",
            Self::CodecErrors => "codec_errors",
        }
    }

    /// High-water marks keep the larger reading; everything else sums.
    #[must_use]
    pub const fn is_max(self) -> bool {
        matches!(self, Self::KeyBytesMax)
    }
}

///
/// MetricValue
///
/// Immutable metric reading. Combining two readings of the same kind is a
/// pure function; `NoOp` is the identity and stands in when metrics are off.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MetricValue {
    #[default]
    NoOp,
    Reading {
        kind: MetricKind,
        value: u64,
    },
}

impl MetricValue {
    #[must_use]
    pub const fn new(kind: MetricKind, value: u64) -> Self {
        Self::Reading { kind, value }
    }

    #[must_use]
    pub const fn kind(self) -> Option<MetricKind> {
        match self {
            Self::NoOp => None,
            Self::Reading { kind, .. } => Some(kind),
        }
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::Reading { value, .. } => value,
        }
    }

    /// Merge two readings; `None` when they measure different kinds.
    #[must_use]
    pub const fn combine(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::NoOp, other) => Some(other),
            (this, Self::NoOp) => Some(this),
            (
                Self::Reading { kind, value: a },
                Self::Reading {
                    kind: other_kind,
                    value: b,
                },
            ) => {
                if kind as u8 != other_kind as u8 {
                    return None;
                }
                let value = if kind.is_max() {
                    if a > b { a } else { b }
                } else {
                    a.saturating_add(b)
                };

                Some(Self::Reading { kind, value })
            }
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("noop"),
            Self::Reading { kind, value } => write!(f, "{}={value}", kind.label()),
        }
    }
}

///
/// TESTS
///
