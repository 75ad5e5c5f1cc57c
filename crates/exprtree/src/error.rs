use crate::node::{BinaryOp, ExprId};
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error surface. Construction and traversal keep their own
/// error types; this enum lets callers propagate either with `?`.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

///
/// BuildError
///
/// Rejected constructor calls. A rejected call never mutates the tree.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuildError {
    #[error("expression {id} does not belong to this tree")]
    UnknownExpr { id: ExprId },

    #[error("expression {id} cannot be both operands of one {op} node")]
    SharedOperand { id: ExprId, op: BinaryOp },

    #[error(
        "expression {child} is already attached to {parent}; duplicate the subtree before reusing it"
    )]
    AlreadyAttached { child: ExprId, parent: ExprId },
}

///
/// TraversalError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TraversalError {
    #[error("expression {id} does not belong to this tree")]
    UnknownExpr { id: ExprId },

    #[error("expression height {height} exceeds the configured maximum of {max}")]
    DepthExceeded { height: usize, max: usize },
}
