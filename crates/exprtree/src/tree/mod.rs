//! Arena-backed predicate trees and the builder DSL.
//!
//! `ExprTree` owns every node of one predicate. Nodes are created bottom-up:
//! leaves first, then binary nodes over already-built operands. Binary
//! constructors reparent their operands as a side effect.

mod view;


use crate::{
    error::{BuildError, TraversalError},
    node::{BinaryOp, ExprId, ExprKind, Node, Parameter, TreeId},
    obs::sink::{RejectReason, TreeEvent, record},
    value::Value,
};
use std::collections::BTreeMap;
use tracing::debug;

// re-exports
pub use view::{BinaryRef, ExprMut, ExprRef};

///
/// ExprTree
///
/// Construction and annotation writes take `&mut self`; traversal only
/// needs `&self`, so a finished tree can be shared across readers.
///
/// Every tree has its own identity and only accepts ids it issued. A clone
/// keeps the identity of its source, so ids issued before the clone address
/// the same nodes in both.
///

#[derive(Clone, Debug)]
pub struct ExprTree {
    id: TreeId,
    nodes: Vec<Node>,
}

impl ExprTree {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: TreeId::next(),
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` was issued by this tree.
    #[must_use]
    pub fn contains(&self, id: ExprId) -> bool {
        id.tree() == self.id && id.index() < self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Leaf constructors
    // ------------------------------------------------------------------

    pub fn field(&mut self, name: impl Into<String>) -> ExprId {
        self.push(ExprKind::field(name.into()))
    }

    pub fn literal(&mut self, value: impl Into<Value>) -> ExprId {
        self.push(ExprKind::literal(value.into()))
    }

    pub fn parameter(&mut self) -> ExprId {
        self.push(ExprKind::Parameter(Parameter))
    }

    pub fn is_null(&mut self, field_name: impl Into<String>) -> ExprId {
        self.push(ExprKind::is_null(field_name.into()))
    }

    // ------------------------------------------------------------------
    // Binary constructors
    // ------------------------------------------------------------------

    pub fn and(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::And, left, right)
    }

    pub fn or(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::Or, left, right)
    }

    pub fn not(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::Not, left, right)
    }

    pub fn equals(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::Equals, left, right)
    }

    pub fn substring(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::Substring, left, right)
    }

    pub fn child(&mut self, left: ExprId, right: ExprId) -> Result<ExprId, BuildError> {
        self.binary(BinaryOp::Child, left, right)
    }

    /// Build a binary node over two unattached operands and reparent them.
    ///
    /// Operand kinds are not checked; `And` over two literals is accepted.
    /// The call is rejected, leaving the tree untouched, when an operand is
    /// foreign to this tree, both operands are the same node, or an operand
    /// already has a parent.
    pub fn binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> Result<ExprId, BuildError> {
        if let Err(err) = self.check_operands(op, left, right) {
            record(TreeEvent::AttachRejected {
                reason: RejectReason::from(&err),
            });
            debug!(%op, %left, %right, error = %err, "rejected binary constructor");

            return Err(err);
        }

        let id = self.push(ExprKind::binary(op, left, right));
        self.reparent(left, id);
        self.reparent(right, id);

        Ok(id)
    }

    fn check_operands(&self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<(), BuildError> {
        for id in [left, right] {
            if !self.contains(id) {
                return Err(BuildError::UnknownExpr { id });
            }
        }

        if left == right {
            return Err(BuildError::SharedOperand { id: left, op });
        }

        for id in [left, right] {
            if let Some(parent) = self.nodes[id.index()].parent {
                return Err(BuildError::AlreadyAttached { child: id, parent });
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Subtree reuse
    // ------------------------------------------------------------------

    /// Deep-copy the subtree rooted at `id` into fresh, unparented nodes.
    ///
    /// This is the supported way to use one sub-predicate in two places.
    /// Annotation payloads are shared with the source nodes. The copy runs
    /// without recursion, so it is safe on arbitrarily deep subtrees.
    pub fn duplicate(&mut self, id: ExprId) -> Result<ExprId, BuildError> {
        if !self.contains(id) {
            return Err(BuildError::UnknownExpr { id });
        }

        // children precede their parent, so ascending id order copies every
        // operand before the node that wraps it
        let mut sources = self.subtree_ids(id);
        sources.sort_unstable();

        let mut copies = BTreeMap::new();
        for source in sources {
            let Node {
                kind, annotations, ..
            } = self.nodes[source.index()].clone();

            let copy = match kind {
                ExprKind::Binary(binary) => {
                    let left = copies[&binary.left()];
                    let right = copies[&binary.right()];
                    let copy = self.push(ExprKind::binary(binary.op(), left, right));
                    self.reparent(left, copy);
                    self.reparent(right, copy);

                    copy
                }
                leaf => self.push(leaf),
            };
            self.nodes[copy.index()].annotations = annotations;
            copies.insert(source, copy);
        }

        Ok(copies[&id])
    }

    fn subtree_ids(&self, root: ExprId) -> Vec<ExprId> {
        let mut ids = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            ids.push(id);
            if let Some(binary) = self.nodes[id.index()].kind.as_binary() {
                stack.push(binary.left());
                stack.push(binary.right());
            }
        }

        ids
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    #[must_use]
    pub fn get(&self, id: ExprId) -> Option<ExprRef<'_>> {
        self.contains(id)
            .then(|| ExprRef::new(self, id, &self.nodes[id.index()]))
    }

    /// Fallible lookup for callers propagating with `?`.
    pub fn try_get(&self, id: ExprId) -> Result<ExprRef<'_>, TraversalError> {
        self.get(id).ok_or(TraversalError::UnknownExpr { id })
    }

    /// Mutable handle for annotation writes.
    pub fn get_mut(&mut self, id: ExprId) -> Option<ExprMut<'_>> {
        if !self.contains(id) {
            return None;
        }

        Some(ExprMut::new(id, &mut self.nodes[id.index()]))
    }

    #[must_use]
    pub fn parent(&self, id: ExprId) -> Option<ExprId> {
        self.contains(id)
            .then(|| self.nodes[id.index()].parent)
            .flatten()
    }

    /// Every node in creation order.
    pub fn iter(&self) -> impl Iterator<Item = ExprRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| ExprRef::new(self, ExprId::new(self.id, index), node))
    }

    /// Nodes without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = ExprRef<'_>> {
        self.iter().filter(|expr| expr.is_root())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(self.id, self.nodes.len());
        record(TreeEvent::NodeBuilt {
            kind: kind.node_kind(),
        });
        self.nodes.push(Node::new(kind));

        id
    }

    fn reparent(&mut self, child: ExprId, parent: ExprId) {
        debug_assert!(child < parent, "children must precede their parent");
        self.nodes[child.index()].parent = Some(parent);
    }

    pub(crate) fn node(&self, id: ExprId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl Default for ExprTree {
    fn default() -> Self {
        Self::new()
    }
}
