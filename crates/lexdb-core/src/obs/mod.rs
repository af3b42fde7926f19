//! Observability: in-process telemetry and sink abstractions.
//!
//! The core never prints or logs. Codec, expression and key activity is
//! reported as `MetricsEvent`s and accumulated per thread.

pub mod metric;
pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metric::{MetricKind, MetricValue};
pub use metrics::{EventOps, EventReport, EventState, TypeCounters};
pub use sink::{
    MetricsEvent, MetricsSink, metrics_enabled, metrics_report, metrics_reset_all,
    set_metrics_enabled, with_metrics_sink,
};
