//! Metrics sink boundary.
//!
//! Collection and query logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between mapping logic
//! and the global metrics state.
use crate::obs::metrics::{self, EventReport};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    DescriptorBuilt {
        role: &'a str,
    },
    ProducerCreated {
        role: &'a str,
        domain_results: u64,
    },
    InitializerCreated {
        role: &'a str,
    },
    RowsAccumulated {
        role: &'a str,
        rows: u64,
    },
    MembershipCheck {
        role: &'a str,
    },
    PositionScan {
        role: &'a str,
    },
    QueuedOpsReplayed {
        role: &'a str,
        applied: u64,
    },
    QueuedOpsIgnored {
        role: &'a str,
        pending: u64,
    },
    ReplayFailed {
        role: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::DescriptorBuilt { .. } => {
                m.ops.descriptors_built = m.ops.descriptors_built.saturating_add(1);
            }

            MetricsEvent::ProducerCreated {
                role,
                domain_results,
            } => {
                m.ops.producers_created = m.ops.producers_created.saturating_add(1);
                m.ops.domain_results_built =
                    m.ops.domain_results_built.saturating_add(domain_results);
                let entry = metrics::collection_entry(m, role);
                entry.producers_created = entry.producers_created.saturating_add(1);
            }

            MetricsEvent::InitializerCreated { .. } => {
                m.ops.initializers_created = m.ops.initializers_created.saturating_add(1);
            }

            MetricsEvent::RowsAccumulated { role, rows } => {
                m.ops.rows_accumulated = m.ops.rows_accumulated.saturating_add(rows);
                let entry = metrics::collection_entry(m, role);
                entry.rows_accumulated = entry.rows_accumulated.saturating_add(rows);
            }

            MetricsEvent::MembershipCheck { .. } => {
                m.ops.membership_checks = m.ops.membership_checks.saturating_add(1);
            }

            MetricsEvent::PositionScan { .. } => {
                m.ops.position_scans = m.ops.position_scans.saturating_add(1);
            }

            MetricsEvent::QueuedOpsReplayed { role, applied } => {
                m.ops.queued_ops_replayed = m.ops.queued_ops_replayed.saturating_add(applied);
                let entry = metrics::collection_entry(m, role);
                entry.queued_ops_replayed = entry.queued_ops_replayed.saturating_add(applied);
            }

            MetricsEvent::QueuedOpsIgnored { role, pending } => {
                m.ops.queued_ops_ignored = m.ops.queued_ops_ignored.saturating_add(pending);
                let entry = metrics::collection_entry(m, role);
                entry.queued_ops_ignored = entry.queued_ops_ignored.saturating_add(pending);
            }

            MetricsEvent::ReplayFailed { .. } => {
                m.ops.replay_failures = m.ops.replay_failures.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
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
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSink {
        events: Cell<u64>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent<'_>) {
            self.events.set(self.events.get() + 1);
        }
    }

    #[test]
    fn override_sink_captures_events_and_restores_global() {
        metrics_reset_all();
        let sink = CountingSink {
            events: Cell::new(0),
        };

        with_metrics_sink(&sink, || {
            record(MetricsEvent::DescriptorBuilt { role: "Person.tags" });
            record(MetricsEvent::PositionScan { role: "Person.tags" });
        });
        assert_eq!(sink.events.get(), 2);
        assert_eq!(metrics_report().ops.descriptors_built, 0);

        record(MetricsEvent::DescriptorBuilt { role: "Person.tags" });
        assert_eq!(metrics_report().ops.descriptors_built, 1);
    }

    #[test]
    fn global_sink_accumulates_per_role() {
        metrics_reset_all();

        record(MetricsEvent::ProducerCreated {
            role: "Person.tags",
            domain_results: 2,
        });
        record(MetricsEvent::RowsAccumulated {
            role: "Person.tags",
            rows: 6,
        });

        let report = metrics_report();
        assert_eq!(report.ops.producers_created, 1);
        assert_eq!(report.ops.domain_results_built, 2);
        assert_eq!(report.collections.len(), 1);
        assert_eq!(report.collections[0].role, "Person.tags");
        assert!((report.collections[0].avg_rows_per_producer - 6.0).abs() < f64::EPSILON);
    }
}
