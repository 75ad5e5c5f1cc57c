use crate::{
    node::{ExprId, Field, IsNull, Literal, NodeKind},
    tree::{BinaryRef, ExprRef, ExprTree},
    visitor::Visitor,
};

///
/// EqualsFixture
///
/// `Equals(Field("a"), Literal(5))`, the smallest tree with a parent.
///

pub(crate) struct EqualsFixture {
    pub(crate) tree: ExprTree,
    pub(crate) field: ExprId,
    pub(crate) literal: ExprId,
    pub(crate) equals: ExprId,
}

pub(crate) fn equals_fixture() -> EqualsFixture {
    let mut tree = ExprTree::new();
    let field = tree.field("a");
    let literal = tree.literal(5);
    let equals = tree.equals(field, literal).expect("fresh operands attach");

    EqualsFixture {
        tree,
        field,
        literal,
        equals,
    }
}

/// `((title CONTAINS "foo" AND state IS NULL) OR NOT(?, owner CHILD OF ?)) AND kind = "new"`,
/// which holds at least one node of every kind.
pub(crate) fn every_kind_tree() -> (ExprTree, ExprId) {
    let mut tree = ExprTree::new();

    let title = tree.field("title");
    let foo = tree.literal("foo");
    let contains = tree.substring(title, foo).expect("substring");
    let state = tree.is_null("state");
    let and = tree.and(contains, state).expect("and");

    let owner = tree.field("owner");
    let group = tree.parameter();
    let child = tree.child(owner, group).expect("child");
    let param = tree.parameter();
    let not = tree.not(param, child).expect("not");

    let or = tree.or(and, not).expect("or");

    let kind = tree.field("kind");
    let new = tree.literal("new");
    let eq = tree.equals(kind, new).expect("equals");
    let root = tree.and(or, eq).expect("root");

    (tree, root)
}

///
/// KindProbe
///
/// Returns the kind named by the visitor method that was called, so tests
/// can compare it with the node's own kind.
///

pub(crate) struct KindProbe;

impl<'t> Visitor<'t> for KindProbe {
    type Output = NodeKind;

    fn visit_field(&mut self, _: ExprRef<'t>, _: &'t Field) -> Self::Output {
        NodeKind::Field
    }

    fn visit_and(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::And
    }

    fn visit_or(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::Or
    }

    fn visit_equals(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::Equals
    }

    fn visit_substring(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::Substring
    }

    fn visit_parameter(&mut self, _: ExprRef<'t>) -> Self::Output {
        NodeKind::Parameter
    }

    fn visit_literal(&mut self, _: ExprRef<'t>, _: &'t Literal) -> Self::Output {
        NodeKind::Literal
    }

    fn visit_not(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::Not
    }

    fn visit_child(&mut self, _: BinaryRef<'t>) -> Self::Output {
        NodeKind::Child
    }

    fn visit_is_null(&mut self, _: ExprRef<'t>, _: &'t IsNull) -> Self::Output {
        NodeKind::IsNull
    }
}
