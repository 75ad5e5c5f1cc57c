//! Double-dispatch visitor protocol.
//!
//! `ExprRef::accept` matches on the node's own kind and calls the one
//! `Visitor` method for it; the visitor decides what that kind means.
//! Every method is required, so a new node kind cannot be added without
//! every visitor handling it.

pub mod explain;


use crate::{
    node::{BinaryOp, ExprKind, Field, IsNull, Literal},
    tree::{BinaryRef, ExprRef},
};

// re-exports
pub use explain::{ExplainNode, ExplainVisitor};

///
/// Visitor
///
/// One handler per node kind. `Output` is chosen by the backend, so a
/// compiler can return `Result<Fragment, CompileError>` while an evaluator
/// returns `bool`.
///

pub trait Visitor<'t> {
    type Output;

    fn visit_field(&mut self, expr: ExprRef<'t>, field: &'t Field) -> Self::Output;

    fn visit_and(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_or(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_equals(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_substring(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_parameter(&mut self, expr: ExprRef<'t>) -> Self::Output;

    fn visit_literal(&mut self, expr: ExprRef<'t>, literal: &'t Literal) -> Self::Output;

    fn visit_not(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_child(&mut self, expr: BinaryRef<'t>) -> Self::Output;

    fn visit_is_null(&mut self, expr: ExprRef<'t>, is_null: &'t IsNull) -> Self::Output;
}

impl<'t> ExprRef<'t> {
    /// Dispatch to the visitor method matching this node's kind.
    ///
    /// Dispatch itself never mutates the tree, so repeated calls with an
    /// equivalent visitor produce equal results.
    pub fn accept<V>(self, visitor: &mut V) -> V::Output
    where
        V: Visitor<'t> + ?Sized,
    {
        match self.kind() {
            ExprKind::Field(field) => visitor.visit_field(self, field),
            ExprKind::Literal(literal) => visitor.visit_literal(self, literal),
            ExprKind::Parameter(_) => visitor.visit_parameter(self),
            ExprKind::IsNull(is_null) => visitor.visit_is_null(self, is_null),
            ExprKind::Binary(binary) => BinaryRef::new(self, binary).accept(visitor),
        }
    }
}

impl<'t> BinaryRef<'t> {
    /// Dispatch a binary node on its operator.
    pub fn accept<V>(self, visitor: &mut V) -> V::Output
    where
        V: Visitor<'t> + ?Sized,
    {
        match self.op() {
            BinaryOp::And => visitor.visit_and(self),
            BinaryOp::Or => visitor.visit_or(self),
            BinaryOp::Not => visitor.visit_not(self),
            BinaryOp::Equals => visitor.visit_equals(self),
            BinaryOp::Substring => visitor.visit_substring(self),
            BinaryOp::Child => visitor.visit_child(self),
        }
    }
}
