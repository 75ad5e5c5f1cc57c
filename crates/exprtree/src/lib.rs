//! Predicate expression trees: an arena of filter nodes, parent and annotation
//! bookkeeping, a typed double-dispatch visitor protocol, and ready-made walks.
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod node;
pub mod obs;
pub mod tree;
pub mod value;
pub mod visitor;
pub mod walk;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default ceiling on subtree height accepted by bounded walks.
///
/// Walks recurse once per nesting level, so this bounds stack usage for
/// predicates assembled from untrusted client input.
pub const DEFAULT_MAX_DEPTH: usize = 256;

///
/// Prelude
///
/// Prelude contains the builder and visitor vocabulary only.
///

pub mod prelude {
    pub use crate::{
        node::{BinaryOp, ExprId, NodeKind},
        tree::{BinaryRef, ExprRef, ExprTree},
        value::Value,
        visitor::Visitor,
        walk::WalkOutcome,
    };
}
