//! Observability: in-process counters and the sink abstraction.
//!
//! Structured log lines go through `tracing` at the call sites; this module
//! only owns counters.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventOps, EventReport, EventState, SourceCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
