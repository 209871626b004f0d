//! Observability: runtime telemetry (metrics), trace hooks, and sink abstractions.
//!
//! Nothing here may change what descriptors, producers, or initializers do;
//! events only describe what already happened.

pub(crate) mod metrics;
pub(crate) mod sink;
pub mod trace;

// re-exports
pub use metrics::{CollectionCounters, CollectionSummary, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
pub use trace::{TraceEvent, TraceSink};
