//! Node vocabulary: ids, kinds, leaf payloads and the shared binary shape.
//!
//! Nodes are plain data. They never hold references to other nodes; links
//! are `ExprId`s into the owning `ExprTree`.

mod annotation;


use crate::value::Value;
use derive_more::Display;
use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicU32, Ordering};

// re-exports
pub use annotation::{AnnotationValue, Annotations};

///
/// TreeId
///
/// Process-unique identity of one `ExprTree`, stamped into every id it
/// issues.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct TreeId(u32);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

///
/// ExprId
///
/// Arena handle of one node. Only meaningful for the tree that issued it;
/// every other tree rejects it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{index}")]
pub struct ExprId {
    tree: TreeId,
    index: usize,
}

impl ExprId {
    pub(crate) const fn new(tree: TreeId, index: usize) -> Self {
        Self { tree, index }
    }

    pub(crate) const fn tree(self) -> TreeId {
        self.tree
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

// serialized as the bare index; tree identity is process-local
impl Serialize for ExprId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.index.serialize(serializer)
    }
}

///
/// NodeKind
///
/// Stable tag for every concrete node kind.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[repr(u8)]
pub enum NodeKind {
    Field = 0x01,
    Literal = 0x02,
    Parameter = 0x03,
    IsNull = 0x04,
    And = 0x10,
    Or = 0x11,
    Not = 0x12,
    Equals = 0x13,
    Substring = 0x14,
    Child = 0x15,
}

impl NodeKind {
    pub const ALL: [Self; 10] = [
        Self::Field,
        Self::Literal,
        Self::Parameter,
        Self::IsNull,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Equals,
        Self::Substring,
        Self::Child,
    ];

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_binary(self) -> bool {
        self.binary_op().is_some()
    }

    #[must_use]
    pub const fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::And => Some(BinaryOp::And),
            Self::Or => Some(BinaryOp::Or),
            Self::Not => Some(BinaryOp::Not),
            Self::Equals => Some(BinaryOp::Equals),
            Self::Substring => Some(BinaryOp::Substring),
            Self::Child => Some(BinaryOp::Child),
            Self::Field | Self::Literal | Self::Parameter | Self::IsNull => None,
        }
    }
}

///
/// BinaryOp
///
/// Which visitor method a binary node dispatches to. The engine attaches no
/// semantics to the operator; visitors interpret it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum BinaryOp {
    And,
    Or,
    Not,
    Equals,
    Substring,
    Child,
}

impl BinaryOp {
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::And => NodeKind::And,
            Self::Or => NodeKind::Or,
            Self::Not => NodeKind::Not,
            Self::Equals => NodeKind::Equals,
            Self::Substring => NodeKind::Substring,
            Self::Child => NodeKind::Child,
        }
    }
}

///
/// Field
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: String,
}

impl Field {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

///
/// Literal
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Literal {
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

///
/// Parameter
///
/// Valueless placeholder, bound by the consumer of the tree.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Parameter;

///
/// IsNull
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IsNull {
    field_name: String,
}

impl IsNull {
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

///
/// Binary
///
/// Shared two-child shape of every binary node.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Binary {
    op: BinaryOp,
    left: ExprId,
    right: ExprId,
}

impl Binary {
    #[must_use]
    pub const fn op(&self) -> BinaryOp {
        self.op
    }

    #[must_use]
    pub const fn left(&self) -> ExprId {
        self.left
    }

    #[must_use]
    pub const fn right(&self) -> ExprId {
        self.right
    }
}

///
/// ExprKind
///
/// Closed set of node payloads. Visitors match on this exhaustively through
/// `ExprRef::accept`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExprKind {
    Field(Field),
    Literal(Literal),
    Parameter(Parameter),
    IsNull(IsNull),
    Binary(Binary),
}

impl ExprKind {
    pub(crate) fn field(name: String) -> Self {
        Self::Field(Field { name })
    }

    pub(crate) const fn literal(value: Value) -> Self {
        Self::Literal(Literal { value })
    }

    pub(crate) fn is_null(field_name: String) -> Self {
        Self::IsNull(IsNull { field_name })
    }

    pub(crate) const fn binary(op: BinaryOp, left: ExprId, right: ExprId) -> Self {
        Self::Binary(Binary { op, left, right })
    }

    #[must_use]
    pub const fn node_kind(&self) -> NodeKind {
        match self {
            Self::Field(_) => NodeKind::Field,
            Self::Literal(_) => NodeKind::Literal,
            Self::Parameter(_) => NodeKind::Parameter,
            Self::IsNull(_) => NodeKind::IsNull,
            Self::Binary(binary) => binary.op.kind(),
        }
    }

    #[must_use]
    pub const fn as_binary(&self) -> Option<&Binary> {
        match self {
            Self::Binary(binary) => Some(binary),
            _ => None,
        }
    }
}

///
/// Node
///
/// Arena slot: payload, parent link and annotation side-table.
///

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) kind: ExprKind,
    pub(crate) parent: Option<ExprId>,
    pub(crate) annotations: Annotations,
}

impl Node {
    pub(crate) fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            parent: None,
            annotations: Annotations::default(),
        }
    }
}
