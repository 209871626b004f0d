use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for mapping and collection operations.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) collections: BTreeMap<String, CollectionCounters>,
}

///
/// EventOps
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Mapping build
    pub descriptors_built: u64,

    // Result wiring
    pub producers_created: u64,
    pub domain_results_built: u64,
    pub initializers_created: u64,
    pub rows_accumulated: u64,

    // Runtime collection operations
    pub membership_checks: u64,
    pub position_scans: u64,

    // Queued operations
    pub queued_ops_replayed: u64,
    pub queued_ops_ignored: u64,
    pub replay_failures: u64,
}

///
/// CollectionCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CollectionCounters {
    pub producers_created: u64,
    pub rows_accumulated: u64,
    pub queued_ops_replayed: u64,
    pub queued_ops_ignored: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Counter entry for one collection role.
pub(crate) fn collection_entry<'a>(
    m: &'a mut EventState,
    role: &str,
) -> &'a mut CollectionCounters {
    m.collections.entry(role.to_string()).or_default()
}

///
/// EventReport
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub collections: Vec<CollectionSummary>,
}

///
/// CollectionSummary
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct CollectionSummary {
    pub role: String,
    pub counters: CollectionCounters,
    pub avg_rows_per_producer: f64,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    with_state(|m| {
        let collections = m
            .collections
            .iter()
            .map(|(role, counters)| {
                let avg_rows_per_producer = if counters.producers_created == 0 {
                    0.0
                } else {
                    counters.rows_accumulated as f64 / counters.producers_created as f64
                };

                CollectionSummary {
                    role: role.clone(),
                    counters: counters.clone(),
                    avg_rows_per_producer,
                }
            })
            .collect();

        EventReport {
            ops: m.ops.clone(),
            collections,
        }
    })
}
