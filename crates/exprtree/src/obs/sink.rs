//! Metrics sink boundary.
//!
//! Tree and walk code MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through TreeEvent and EventSink.
use crate::{error::BuildError, node::NodeKind, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn EventSink>> = RefCell::new(None);
}

///
/// WalkKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkKind {
    PostOrder,
    Ancestors,
}

///
/// RejectReason
///
/// Why a binary constructor refused its operands.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectReason {
    UnknownExpr,
    SharedOperand,
    AlreadyAttached,
}

impl From<&BuildError> for RejectReason {
    fn from(err: &BuildError) -> Self {
        match err {
            BuildError::UnknownExpr { .. } => Self::UnknownExpr,
            BuildError::SharedOperand { .. } => Self::SharedOperand,
            BuildError::AlreadyAttached { .. } => Self::AlreadyAttached,
        }
    }
}

///
/// TreeEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TreeEvent {
    NodeBuilt {
        kind: NodeKind,
    },
    AttachRejected {
        reason: RejectReason,
    },
    WalkFinish {
        kind: WalkKind,
        visited: u64,
        stopped: bool,
    },
    DepthRejected {
        height: usize,
        max: usize,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: TreeEvent);
}

/// GlobalEventSink
/// Default thread-local sink that writes into the metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalEventSink;

impl EventSink for GlobalEventSink {
    fn record(&self, event: TreeEvent) {
        match event {
            TreeEvent::NodeBuilt { kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.nodes_built = m.ops.nodes_built.saturating_add(1);
                    let entry = m.kinds.entry(kind.to_string()).or_default();
                    *entry = entry.saturating_add(1);
                });
            }

            TreeEvent::AttachRejected { reason } => {
                metrics::with_state_mut(|m| match reason {
                    RejectReason::UnknownExpr => {
                        m.ops.attach_unknown = m.ops.attach_unknown.saturating_add(1);
                    }
                    RejectReason::SharedOperand => {
                        m.ops.attach_shared = m.ops.attach_shared.saturating_add(1);
                    }
                    RejectReason::AlreadyAttached => {
                        m.ops.attach_reparent = m.ops.attach_reparent.saturating_add(1);
                    }
                });
            }

            TreeEvent::WalkFinish {
                kind,
                visited,
                stopped,
            } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        WalkKind::PostOrder => {
                            m.ops.post_order_walks = m.ops.post_order_walks.saturating_add(1);
                        }
                        WalkKind::Ancestors => {
                            m.ops.ancestor_walks = m.ops.ancestor_walks.saturating_add(1);
                        }
                    }
                    m.ops.nodes_visited = m.ops.nodes_visited.saturating_add(visited);
                    if stopped {
                        m.ops.walks_stopped = m.ops.walks_stopped.saturating_add(1);
                    }
                });
            }

            TreeEvent::DepthRejected { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.depth_rejections = m.ops.depth_rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_EVENT_SINK: GlobalEventSink = GlobalEventSink;

pub(crate) fn record(event: TreeEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn EventSink` in `with_event_sink`.
        // - `with_event_sink` restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_EVENT_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventState {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary event sink override.
pub fn with_event_sink<T>(sink: &dyn EventSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn EventSink>);

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
    let sink_ptr = unsafe { std::mem::transmute::<&dyn EventSink, *const dyn EventSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

/// WalkSpan
/// RAII guard that emits the finish event for one walk.
/// Ensures accounting happens even if a callback unwinds.

pub(crate) struct WalkSpan {
    kind: WalkKind,
    visited: u64,
    stopped: bool,
}

impl WalkSpan {
    #[must_use]
    pub(crate) const fn new(kind: WalkKind) -> Self {
        Self {
            kind,
            visited: 0,
            stopped: false,
        }
    }

    pub(crate) const fn visit(&mut self) {
        self.visited = self.visited.saturating_add(1);
    }

    pub(crate) const fn set_stopped(&mut self) {
        self.stopped = true;
    }
}

impl Drop for WalkSpan {
    fn drop(&mut self) {
        record(TreeEvent::WalkFinish {
            kind: self.kind,
            visited: self.visited,
            stopped: self.stopped,
        });
    }
}
