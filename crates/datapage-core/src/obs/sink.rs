//! Metrics sink boundary.
//!
//! Providers and paginators MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    PageFetched {
        source: &'static str,
        rows: u64,
    },
    TotalCountFetched {
        source: &'static str,
        total: u64,
    },
    KeysDerived {
        source: &'static str,
        keys: u64,
    },
    Refreshed {
        source: &'static str,
    },
    PageCalculated {
        page_count: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counter state.
/// Used whenever no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PageFetched { source, rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.page_fetches = m.ops.page_fetches.saturating_add(1);
                    m.ops.rows_fetched = m.ops.rows_fetched.saturating_add(rows);

                    let entry = m.sources.entry(source.to_string()).or_default();
                    entry.page_fetches = entry.page_fetches.saturating_add(1);
                    entry.rows_fetched = entry.rows_fetched.saturating_add(rows);
                });
            }

            MetricsEvent::TotalCountFetched { source, total } => {
                metrics::with_state_mut(|m| {
                    m.ops.total_count_fetches = m.ops.total_count_fetches.saturating_add(1);

                    let entry = m.sources.entry(source.to_string()).or_default();
                    entry.total_count_fetches = entry.total_count_fetches.saturating_add(1);
                    entry.last_total_count = Some(total);
                });
            }

            MetricsEvent::KeysDerived { source, keys } => {
                metrics::with_state_mut(|m| {
                    m.ops.keys_derived = m.ops.keys_derived.saturating_add(keys);

                    let entry = m.sources.entry(source.to_string()).or_default();
                    entry.keys_derived = entry.keys_derived.saturating_add(keys);
                });
            }

            MetricsEvent::Refreshed { source } => {
                metrics::with_state_mut(|m| {
                    m.ops.refreshes = m.ops.refreshes.saturating_add(1);

                    let entry = m.sources.entry(source.to_string()).or_default();
                    entry.refreshes = entry.refreshes.saturating_add(1);
                });
            }

            MetricsEvent::PageCalculated { page_count } => {
                metrics::with_state_mut(|m| {
                    m.ops.calculations = m.ops.calculations.saturating_add(1);
                    m.ops.max_page_count = m.ops.max_page_count.max(page_count);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Convert a length into a counter value.
pub(crate) fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
