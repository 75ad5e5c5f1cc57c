use crate::{
    node::{AnnotationValue, Annotations, Binary, BinaryOp, ExprId, ExprKind, Node, NodeKind},
    tree::ExprTree,
};
use derive_more::Deref;
use std::{any::Any, fmt, ptr, sync::Arc};

///
/// ExprRef
///
/// Borrowed view of one node. Equality is identity: same tree, same id.
///

#[derive(Clone, Copy)]
pub struct ExprRef<'t> {
    tree: &'t ExprTree,
    id: ExprId,
    node: &'t Node,
}

impl<'t> ExprRef<'t> {
    pub(crate) const fn new(tree: &'t ExprTree, id: ExprId, node: &'t Node) -> Self {
        Self { tree, id, node }
    }

    #[must_use]
    pub const fn id(self) -> ExprId {
        self.id
    }

    #[must_use]
    pub const fn tree(self) -> &'t ExprTree {
        self.tree
    }

    #[must_use]
    pub const fn kind(self) -> &'t ExprKind {
        &self.node.kind
    }

    #[must_use]
    pub const fn node_kind(self) -> NodeKind {
        self.node.kind.node_kind()
    }

    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.node
            .parent
            .map(|parent| Self::new(self.tree, parent, self.tree.node(parent)))
    }

    #[must_use]
    pub const fn is_root(self) -> bool {
        self.node.parent.is_none()
    }

    #[must_use]
    pub fn as_binary(self) -> Option<BinaryRef<'t>> {
        self.node
            .kind
            .as_binary()
            .map(|binary| BinaryRef::new(self, binary))
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn annotations(self) -> &'t Annotations {
        &self.node.annotations
    }

    /// Payload stored at `key`, or `None` when the key was never set.
    #[must_use]
    pub fn annotation(self, key: &str) -> Option<&'t AnnotationValue> {
        self.node.annotations.get(key)
    }

    #[must_use]
    pub fn annotation_as<T: Any>(self, key: &str) -> Option<&'t T> {
        self.node.annotations.get_as(key)
    }

    pub fn annotation_keys(self) -> impl Iterator<Item = &'t str> {
        self.node.annotations.keys().map(String::as_str)
    }
}

impl PartialEq for ExprRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ExprRef<'_> {}

impl fmt::Debug for ExprRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprRef")
            .field("id", &self.id)
            .field("kind", &self.node.kind)
            .field("parent", &self.node.parent)
            .finish()
    }
}

///
/// BinaryRef
///
/// View of a binary node with resolved children. Derefs to the node's
/// `ExprRef` for parent and annotation access.
///

#[derive(Clone, Copy, Debug, Deref, Eq, PartialEq)]
pub struct BinaryRef<'t> {
    #[deref]
    expr: ExprRef<'t>,
    binary: &'t Binary,
}

impl<'t> BinaryRef<'t> {
    pub(crate) const fn new(expr: ExprRef<'t>, binary: &'t Binary) -> Self {
        Self { expr, binary }
    }

    #[must_use]
    pub const fn expr(self) -> ExprRef<'t> {
        self.expr
    }

    #[must_use]
    pub const fn op(self) -> BinaryOp {
        self.binary.op()
    }

    #[must_use]
    pub fn left(self) -> ExprRef<'t> {
        self.child(self.binary.left())
    }

    #[must_use]
    pub fn right(self) -> ExprRef<'t> {
        self.child(self.binary.right())
    }

    fn child(self, id: ExprId) -> ExprRef<'t> {
        let tree = self.expr.tree;

        ExprRef::new(tree, id, tree.node(id))
    }
}

///
/// ExprMut
///
/// Exclusive handle for annotation writes. Structure stays immutable.
///

pub struct ExprMut<'t> {
    id: ExprId,
    node: &'t mut Node,
}

impl<'t> ExprMut<'t> {
    pub(crate) const fn new(id: ExprId, node: &'t mut Node) -> Self {
        Self { id, node }
    }

    #[must_use]
    pub const fn id(&self) -> ExprId {
        self.id
    }

    /// Store `value` at `key`, returning the payload it replaced.
    pub fn set_annotation<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Option<AnnotationValue> {
        self.node.annotations.insert(key, Arc::new(value))
    }

    /// Store an already shared payload at `key`.
    pub fn set_annotation_value(
        &mut self,
        key: impl Into<String>,
        value: AnnotationValue,
    ) -> Option<AnnotationValue> {
        self.node.annotations.insert(key, value)
    }

    pub fn remove_annotation(&mut self, key: &str) -> Option<AnnotationValue> {
        self.node.annotations.remove(key)
    }

    #[must_use]
    pub fn annotation_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.node.annotations.get_as(key)
    }
}
