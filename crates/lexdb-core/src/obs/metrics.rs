use crate::{
    codec::DataType,
    error::{ErrorClass, ErrorOrigin},
    obs::metric::{MetricKind, MetricValue},
};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Reported counters for codec, expression and key activity, with type and
/// error labels rendered as text.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub types: BTreeMap<String, TypeCounters>,
    pub errors: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Codec
    pub values_encoded: u64,
    pub values_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub codec_errors: u64,

    // Expressions
    pub expressions_evaluated: u64,
    pub expressions_null: u64,

    // Composite keys
    pub keys_built: u64,
    pub keys_failed: u64,
    pub key_bytes_total: u64,
    pub key_bytes_max: u64,
}

impl EventOps {
    #[must_use]
    pub const fn get(&self, kind: MetricKind) -> u64 {
        match kind {
            MetricKind::ValuesEncoded => self.values_encoded,
            MetricKind::ValuesDecoded => self.values_decoded,
            MetricKind::BytesEncoded => self.bytes_encoded,
            MetricKind::BytesDecoded => self.bytes_decoded,
            MetricKind::ExpressionsEvaluated => self.expressions_evaluated,
            MetricKind::ExpressionsNull => self.expressions_null,
            MetricKind::KeysBuilt => self.keys_built,
            MetricKind::KeysFailed => self.keys_failed,
            MetricKind::KeyBytesTotal => self.key_bytes_total,
            MetricKind::KeyBytesMax => self.key_bytes_max,
            MetricKind::CodecErrors => self.codec_errors,
        }
    }

    const fn slot(&mut self, kind: MetricKind) -> &mut u64 {
        match kind {
            MetricKind::ValuesEncoded => &mut self.values_encoded,
            MetricKind::ValuesDecoded => &mut self.values_decoded,
            MetricKind::BytesEncoded => &mut self.bytes_encoded,
            MetricKind::BytesDecoded => &mut self.bytes_decoded,
            MetricKind::ExpressionsEvaluated => &mut self.expressions_evaluated,
            MetricKind::ExpressionsNull => &mut self.expressions_null,
            MetricKind::KeysBuilt => &mut self.keys_built,
            MetricKind::KeysFailed => &mut self.keys_failed,
            MetricKind::KeyBytesTotal => &mut self.key_bytes_total,
            MetricKind::KeyBytesMax => &mut self.key_bytes_max,
            MetricKind::CodecErrors => &mut self.codec_errors,
        }
    }

    /// Fold one reading into the matching counter.
    pub fn apply(&mut self, reading: MetricValue) {
        let Some(kind) = reading.kind() else {
            return;
        };
        let current = MetricValue::new(kind, self.get(kind));
        if let Some(merged) = current.combine(reading) {
            *self.slot(kind) = merged.value();
        }
    }

    /// Every counter as an immutable reading.
    #[must_use]
    pub fn readings(&self) -> Vec<MetricValue> {
        MetricKind::ALL
            .iter()
            .map(|&kind| MetricValue::new(kind, self.get(kind)))
            .collect()
    }
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeCounters {
    pub encoded: u64,
    pub decoded: u64,
}

///
/// EventReport
/// Point-in-time copy of one thread's counters. Reports from several worker
/// threads merge into one.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: EventState,
}

impl EventReport {
    #[must_use]
    pub fn readings(&self) -> Vec<MetricValue> {
        self.counters.ops.readings()
    }

    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for reading in other.readings() {
            self.counters.ops.apply(reading);
        }
        for (name, counters) in &other.counters.types {
            let entry = self.counters.types.entry(name.clone()).or_default();
            entry.encoded = entry.encoded.saturating_add(counters.encoded);
            entry.decoded = entry.decoded.saturating_add(counters.decoded);
        }
        for (label, count) in &other.counters.errors {
            let entry = self.counters.errors.entry(label.clone()).or_default();
            *entry = entry.saturating_add(*count);
        }

        self
    }
}

///
/// ThreadState
/// Live counters of one thread, keyed by descriptor until reported.
///

#[derive(Default)]
pub(crate) struct ThreadState {
    pub(crate) ops: EventOps,
    pub(crate) types: BTreeMap<DataType, TypeCounters>,
    pub(crate) errors: BTreeMap<(ErrorOrigin, ErrorClass), u64>,
}

impl ThreadState {
    fn snapshot(&self) -> EventState {
        EventState {
            ops: self.ops.clone(),
            types: self
                .types
                .iter()
                .map(|(data_type, counters)| (data_type.to_string(), counters.clone()))
                .collect(),
            errors: self
                .errors
                .iter()
                .map(|((origin, class), count)| (format!("{origin}:{class}"), *count))
                .collect(),
        }
    }
}

thread_local! {
    static EVENT_STATE: RefCell<ThreadState> = RefCell::new(ThreadState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&ThreadState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut ThreadState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters on the calling thread.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = ThreadState::default());
}

pub(crate) fn report() -> EventReport {
    EventReport {
        counters: with_state(ThreadState::snapshot),
    }
}
