use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for provider and paginator activity.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub sources: BTreeMap<String, SourceCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Fetches
    pub page_fetches: u64,
    pub total_count_fetches: u64,
    pub rows_fetched: u64,
    pub keys_derived: u64,

    // Lifecycle
    pub refreshes: u64,

    // Page arithmetic
    pub calculations: u64,
    pub max_page_count: u64,
}

///
/// SourceCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SourceCounters {
    pub page_fetches: u64,
    pub total_count_fetches: u64,
    pub rows_fetched: u64,
    pub keys_derived: u64,
    pub refreshes: u64,
    pub last_total_count: Option<u64>,
}

///
/// EventReport
///

pub type EventReport = EventState;

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

/// Clone the current counters.
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
