use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for tree construction and walks.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,

    /// Nodes built, keyed by node kind name.
    pub kinds: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Construction
    pub nodes_built: u64,
    pub attach_unknown: u64,
    pub attach_shared: u64,
    pub attach_reparent: u64,

    // Walks
    pub post_order_walks: u64,
    pub ancestor_walks: u64,
    pub walks_stopped: u64,
    pub nodes_visited: u64,
    pub depth_rejections: u64,
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

/// Snapshot the current state.
pub(crate) fn report() -> EventState {
    with_state(Clone::clone)
}
