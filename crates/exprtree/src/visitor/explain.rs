//! Deterministic, read-only rendering of expression trees; must not
//! interpret operators.

use crate::{
    node::{ExprId, Field, IsNull, Literal, NodeKind},
    tree::{BinaryRef, ExprRef},
    visitor::Visitor,
};
use serde::Serialize;
use std::fmt;

///
/// ExplainNode
///
/// Stable, serializable mirror of one subtree for logs and snapshots.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExplainNode {
    pub id: ExprId,
    pub kind: NodeKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

///
/// ExplainVisitor
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ExplainVisitor;

impl ExplainVisitor {
    fn leaf(expr: ExprRef<'_>, label: Option<String>) -> ExplainNode {
        ExplainNode {
            id: expr.id(),
            kind: expr.node_kind(),
            label,
            annotations: annotation_keys(expr),
            children: Vec::new(),
        }
    }

    fn binary(&mut self, expr: BinaryRef<'_>) -> ExplainNode {
        let left = expr.left().accept(self);
        let right = expr.right().accept(self);

        ExplainNode {
            id: expr.id(),
            kind: expr.node_kind(),
            label: None,
            annotations: annotation_keys(expr.expr()),
            children: vec![left, right],
        }
    }
}

fn annotation_keys(expr: ExprRef<'_>) -> Vec<String> {
    expr.annotation_keys().map(str::to_string).collect()
}

impl<'t> Visitor<'t> for ExplainVisitor {
    type Output = ExplainNode;

    fn visit_field(&mut self, expr: ExprRef<'t>, field: &'t Field) -> Self::Output {
        Self::leaf(expr, Some(field.name().to_string()))
    }

    fn visit_and(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_or(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_equals(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_substring(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_parameter(&mut self, expr: ExprRef<'t>) -> Self::Output {
        Self::leaf(expr, None)
    }

    fn visit_literal(&mut self, expr: ExprRef<'t>, literal: &'t Literal) -> Self::Output {
        Self::leaf(expr, Some(literal.value().to_string()))
    }

    fn visit_not(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_child(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_is_null(&mut self, expr: ExprRef<'t>, is_null: &'t IsNull) -> Self::Output {
        Self::leaf(expr, Some(is_null.field_name().to_string()))
    }
}

impl ExprRef<'_> {
    #[must_use]
    pub fn explain(self) -> ExplainNode {
        self.accept(&mut ExplainVisitor)
    }
}

///
/// InfixWriter
///
/// Renders a subtree as one line of infix text, e.g.
/// `(title = "foo" AND state IS NULL)`.
///

struct InfixWriter<'f, 'a> {
    f: &'f mut fmt::Formatter<'a>,
}

impl InfixWriter<'_, '_> {
    fn grouped(&mut self, expr: BinaryRef<'_>, op: &str) -> fmt::Result {
        self.f.write_str("(")?;
        expr.left().accept(self)?;
        write!(self.f, " {op} ")?;
        expr.right().accept(self)?;
        self.f.write_str(")")
    }

    fn comparison(&mut self, expr: BinaryRef<'_>, op: &str) -> fmt::Result {
        self.operand(expr.left())?;
        write!(self.f, " {op} ")?;
        self.operand(expr.right())
    }

    // bare comparisons nested in a comparison would read ambiguously
    fn operand(&mut self, expr: ExprRef<'_>) -> fmt::Result {
        if matches!(
            expr.node_kind(),
            NodeKind::Equals | NodeKind::Substring | NodeKind::Child
        ) {
            self.f.write_str("(")?;
            expr.accept(self)?;
            self.f.write_str(")")
        } else {
            expr.accept(self)
        }
    }
}

impl<'t> Visitor<'t> for InfixWriter<'_, '_> {
    type Output = fmt::Result;

    fn visit_field(&mut self, _: ExprRef<'t>, field: &'t Field) -> Self::Output {
        self.f.write_str(field.name())
    }

    fn visit_and(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.grouped(expr, "AND")
    }

    fn visit_or(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.grouped(expr, "OR")
    }

    fn visit_equals(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.comparison(expr, "=")
    }

    fn visit_substring(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.comparison(expr, "CONTAINS")
    }

    fn visit_parameter(&mut self, _: ExprRef<'t>) -> Self::Output {
        self.f.write_str("?")
    }

    fn visit_literal(&mut self, _: ExprRef<'t>, literal: &'t Literal) -> Self::Output {
        write!(self.f, "{}", literal.value())
    }

    fn visit_not(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.f.write_str("NOT(")?;
        expr.left().accept(self)?;
        self.f.write_str(", ")?;
        expr.right().accept(self)?;
        self.f.write_str(")")
    }

    fn visit_child(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.comparison(expr, "CHILD OF")
    }

    fn visit_is_null(&mut self, _: ExprRef<'t>, is_null: &'t IsNull) -> Self::Output {
        write!(self.f, "{} IS NULL", is_null.field_name())
    }
}

impl fmt::Display for ExprRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut InfixWriter { f })
    }
}
