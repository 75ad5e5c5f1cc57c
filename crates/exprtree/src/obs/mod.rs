//! Observability: process-local counters and the sink they flow through.
//!
//! Tree and walk code emits `TreeEvent`s via `sink::record`; nothing else
//! touches the metrics state directly.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventState};
pub use sink::{
    EventSink, RejectReason, TreeEvent, WalkKind, metrics_report, metrics_reset_all,
    with_event_sink,
};
