use crate::{
    node::{BinaryOp, ExprId},
    tree::ExprTree,
    value::Value,
    walk::{WalkOutcome, post_order},
};
use proptest::prelude::*;
use std::collections::BTreeMap;

///
/// Shape
///
/// Builder-independent description of a tree, replayed into an `ExprTree`.
///

#[derive(Clone, Debug)]
enum Shape {
    Field(String),
    Literal(Value),
    Parameter,
    IsNull(String),
    Binary(BinaryOp, Box<Self>, Box<Self>),
}

impl Shape {
    fn build(&self, tree: &mut ExprTree) -> ExprId {
        match self {
            Self::Field(name) => tree.field(name.clone()),
            Self::Literal(value) => tree.literal(value.clone()),
            Self::Parameter => tree.parameter(),
            Self::IsNull(name) => tree.is_null(name.clone()),
            Self::Binary(op, left, right) => {
                let l = left.build(tree);
                let r = right.build(tree);
                tree.binary(*op, l, r).expect("fresh operands attach")
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Binary(_, l, r) => 1 + l.len() + r.len(),
            _ => 1,
        }
    }
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![Just("title"), Just("state"), Just("owner"), Just("tags")].prop_map(String::from)
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        "[a-z]{0,6}".prop_map(Value::Text),
    ]
}

fn arb_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::And),
        Just(BinaryOp::Or),
        Just(BinaryOp::Not),
        Just(BinaryOp::Equals),
        Just(BinaryOp::Substring),
        Just(BinaryOp::Child),
    ]
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        arb_name().prop_map(Shape::Field),
        arb_value().prop_map(Shape::Literal),
        Just(Shape::Parameter),
        arb_name().prop_map(Shape::IsNull),
    ];

    leaf.prop_recursive(6, 64, 2, |inner| {
        (arb_op(), inner.clone(), inner)
            .prop_map(|(op, l, r)| Shape::Binary(op, Box::new(l), Box::new(r)))
    })
}

proptest! {
    #[test]
    fn post_order_visits_every_node_once_children_first(shape in arb_shape()) {
        let mut tree = ExprTree::new();
        let root = shape.build(&mut tree);
        let order = tree.get(root).expect("root").descendants_post_order();

        prop_assert_eq!(order.len(), shape.len());
        prop_assert_eq!(order.len(), tree.len());
        prop_assert_eq!(order.last().map(|e| e.id()), Some(root));

        let position: BTreeMap<ExprId, usize> =
            order.iter().enumerate().map(|(i, e)| (e.id(), i)).collect();
        prop_assert_eq!(position.len(), order.len());

        for expr in &order {
            if let Some(parent) = expr.parent() {
                prop_assert!(position[&expr.id()] < position[&parent.id()]);
            }
        }
    }

    #[test]
    fn ancestor_chains_end_at_the_root(shape in arb_shape()) {
        let mut tree = ExprTree::new();
        let root = shape.build(&mut tree);
        let height = tree.get(root).expect("root").height();

        for expr in tree.iter() {
            let chain = expr.ancestors().map(|e| e.id()).collect::<Vec<_>>();

            prop_assert_eq!(chain.len(), expr.depth());
            prop_assert!(chain.len() < height);
            if expr.id() == root {
                prop_assert!(chain.is_empty());
            } else {
                prop_assert_eq!(chain.last().copied(), Some(root));
            }
        }
    }

    #[test]
    fn early_exit_visits_a_prefix(shape in arb_shape(), stop_at in 0usize..64) {
        let mut tree = ExprTree::new();
        let root = shape.build(&mut tree);
        let root = tree.get(root).expect("root");
        let full = root.descendants_post_order();

        let mut seen = Vec::new();
        let outcome = post_order(root, |expr| {
            seen.push(expr);
            seen.len() <= stop_at
        });

        if stop_at < full.len() {
            prop_assert_eq!(outcome, WalkOutcome::Stopped);
            prop_assert_eq!(&seen[..], &full[..=stop_at]);
        } else {
            prop_assert_eq!(outcome, WalkOutcome::Completed);
            prop_assert_eq!(seen, full);
        }
    }
}
