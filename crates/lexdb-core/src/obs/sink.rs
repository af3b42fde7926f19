//! Metrics sink boundary.
//!
//! Codec, expression and key logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between evaluation logic
//! and the thread-local metrics state.
use crate::{
    codec::DataType,
    error::{ErrorClass, ErrorOrigin},
    obs::{
        metric::{MetricKind, MetricValue},
        metrics,
    },
};
use std::{
    cell::RefCell,
    sync::atomic::{AtomicBool, Ordering},
};

static METRICS_ENABLED: AtomicBool = AtomicBool::new(true);

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ValueEncoded {
        data_type: DataType,
        bytes: u64,
    },
    ValueDecoded {
        data_type: DataType,
        bytes: u64,
    },
    CodecError {
        origin: ErrorOrigin,
        class: ErrorClass,
    },
    ExpressionEvaluated {
        node: &'static str,
        produced: bool,
    },
    KeyBuilt {
        fields: u64,
        bytes: u64,
        ok: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// ThreadMetricsSink
/// Default sink that writes into the calling thread's metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct ThreadMetricsSink;

impl MetricsSink for ThreadMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ValueEncoded { data_type, bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.apply(MetricValue::new(MetricKind::ValuesEncoded, 1));
                    m.ops.apply(MetricValue::new(MetricKind::BytesEncoded, bytes));
                    let entry = m.types.entry(data_type).or_default();
                    entry.encoded = entry.encoded.saturating_add(1);
                });
            }

            MetricsEvent::ValueDecoded { data_type, bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.apply(MetricValue::new(MetricKind::ValuesDecoded, 1));
                    m.ops.apply(MetricValue::new(MetricKind::BytesDecoded, bytes));
                    let entry = m.types.entry(data_type).or_default();
                    entry.decoded = entry.decoded.saturating_add(1);
                });
            }

            MetricsEvent::CodecError { origin, class } => {
                metrics::with_state_mut(|m| {
                    m.ops.apply(MetricValue::new(MetricKind::CodecErrors, 1));
                    let entry = m.errors.entry((origin, class)).or_default();
                    *entry = entry.saturating_add(1);
                });
            }

            MetricsEvent::ExpressionEvaluated { produced, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.apply(MetricValue::new(MetricKind::ExpressionsEvaluated, 1));
                    if !produced {
                        m.ops.apply(MetricValue::new(MetricKind::ExpressionsNull, 1));
                    }
                });
            }

            MetricsEvent::KeyBuilt { bytes, ok, .. } => {
                metrics::with_state_mut(|m| {
                    if ok {
                        m.ops.apply(MetricValue::new(MetricKind::KeysBuilt, 1));
                        m.ops.apply(MetricValue::new(MetricKind::KeyBytesTotal, bytes));
                        m.ops.apply(MetricValue::new(MetricKind::KeyBytesMax, bytes));
                    } else {
                        m.ops.apply(MetricValue::new(MetricKind::KeysFailed, 1));
                    }
                });
            }
        }
    }
}

pub(crate) const THREAD_METRICS_SINK: ThreadMetricsSink = ThreadMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else if metrics_enabled() {
        THREAD_METRICS_SINK.record(event);
    }
}

/// Return whether the default thread-local sink accumulates events.
#[must_use]
pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// Turn the default sink on or off process-wide. Scoped overrides still
/// receive every event.
pub fn set_metrics_enabled(enabled: bool) {
    METRICS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Snapshot the calling thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the calling thread's metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` always restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

/// KeySpan
/// RAII guard around one composite-key build.
/// Emits `KeyBuilt` on drop, so failed builds are counted on error paths.

pub(crate) struct KeySpan {
    fields: u64,
    bytes: u64,
    ok: bool,
}

impl KeySpan {
    #[must_use]
    pub(crate) const fn new(fields: usize) -> Self {
        Self {
            fields: fields as u64,
            bytes: 0,
            ok: false,
        }
    }

    /// Mark the build successful with its final key length.
    pub(crate) const fn finish(&mut self, bytes: usize) {
        self.bytes = bytes as u64;
        self.ok = true;
    }
}

impl Drop for KeySpan {
    fn drop(&mut self) {
        record(MetricsEvent::KeyBuilt {
            fields: self.fields,
            bytes: self.bytes,
            ok: self.ok,
        });
    }
}

///
/// TESTS
///
