mod property;

use crate::{
    config::WalkConfig,
    error::TraversalError,
    node::{ExprId, NodeKind},
    obs::{metrics_report, metrics_reset_all},
    test_support::{equals_fixture, every_kind_tree},
    tree::ExprTree,
    walk::{WalkOutcome, ancestors, check_height, post_order, post_order_bounded},
};

// Build a left-leaning chain of `And` nodes `levels` deep.
fn and_chain(levels: usize) -> (ExprTree, ExprId) {
    let mut tree = ExprTree::new();
    let mut acc = tree.field("f0");

    for i in 1..levels {
        let next = tree.field(format!("f{i}"));
        acc = tree.and(acc, next).expect("chain");
    }

    (tree, acc)
}

// ---- post-order --------------------------------------------------------

#[test]
fn post_order_visits_children_before_parent() {
    let f = equals_fixture();
    let mut seen = Vec::new();

    let outcome = post_order(f.tree.get(f.equals).expect("root"), |expr| {
        seen.push(expr.id());
        true
    });

    assert_eq!(outcome, WalkOutcome::Completed);
    assert_eq!(seen, vec![f.field, f.literal, f.equals]);
}

#[test]
fn post_order_stops_at_the_first_false() {
    let f = equals_fixture();
    let mut seen = Vec::new();

    let outcome = post_order(f.tree.get(f.equals).expect("root"), |expr| {
        seen.push(expr.id());
        expr.id() != f.literal
    });

    assert_eq!(outcome, WalkOutcome::Stopped);
    assert_eq!(seen, vec![f.field, f.literal]);
}

#[test]
fn post_order_on_a_leaf_visits_only_the_leaf() {
    let f = equals_fixture();
    let mut seen = Vec::new();

    post_order(f.tree.get(f.field).expect("leaf"), |expr| {
        seen.push(expr.id());
        true
    });

    assert_eq!(seen, vec![f.field]);
}

#[test]
fn post_order_covers_every_binary_kind() {
    let (tree, root) = every_kind_tree();
    let kinds = tree
        .get(root)
        .expect("root")
        .descendants_post_order()
        .iter()
        .map(|e| e.node_kind())
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec![
            NodeKind::Field,
            NodeKind::Literal,
            NodeKind::Substring,
            NodeKind::IsNull,
            NodeKind::And,
            NodeKind::Parameter,
            NodeKind::Field,
            NodeKind::Parameter,
            NodeKind::Child,
            NodeKind::Not,
            NodeKind::Or,
            NodeKind::Field,
            NodeKind::Literal,
            NodeKind::Equals,
            NodeKind::And,
        ]
    );
}

#[test]
fn stopped_walk_does_not_resume() {
    let (tree, root) = every_kind_tree();
    let root = tree.get(root).expect("root");
    let mut calls = 0;

    let outcome = post_order(root, |_| {
        calls += 1;
        calls < 3
    });
    assert!(outcome.is_stopped());
    assert_eq!(calls, 3);

    // a fresh walk starts over from the first leaf
    let mut first = None;
    post_order(root, |expr| {
        first = Some(expr.node_kind());
        false
    });
    assert_eq!(first, Some(NodeKind::Field));
}

// ---- bounded -----------------------------------------------------------

#[test]
fn bounded_walk_rejects_deep_trees_before_visiting() {
    metrics_reset_all();

    let (tree, root) = and_chain(10);
    let root = tree.get(root).expect("root");
    assert_eq!(root.height(), 10);

    let mut visited = 0;
    let err = post_order_bounded(root, &WalkConfig::default().with_max_depth(9), |_| {
        visited += 1;
        true
    })
    .expect_err("too deep");

    assert_eq!(err, TraversalError::DepthExceeded { height: 10, max: 9 });
    assert_eq!(visited, 0);
    assert_eq!(metrics_report().ops.depth_rejections, 1);
}

#[test]
fn bounded_walk_accepts_trees_at_the_limit() {
    let (tree, root) = and_chain(10);
    let root = tree.get(root).expect("root");

    let outcome = post_order_bounded(root, &WalkConfig::default().with_max_depth(10), |_| true)
        .expect("within limit");
    assert!(outcome.is_completed());

    assert!(check_height(root, &WalkConfig::unbounded()).is_ok());
}

#[test]
fn height_is_computed_without_recursion() {
    let (tree, root) = and_chain(50_000);

    assert_eq!(tree.get(root).expect("root").height(), 50_000);
    assert!(
        check_height(tree.get(root).expect("root"), &WalkConfig::default()).is_err()
    );
}

// ---- ancestors ---------------------------------------------------------

#[test]
fn ancestors_of_a_leaf_end_at_the_root() {
    let f = equals_fixture();
    let mut seen = Vec::new();

    let outcome = ancestors(f.tree.get(f.field).expect("field"), |expr| {
        seen.push(expr.id());
        true
    });

    assert_eq!(outcome, WalkOutcome::Completed);
    assert_eq!(seen, vec![f.equals]);
}

#[test]
fn ancestors_of_a_root_is_empty() {
    let f = equals_fixture();
    let mut seen = Vec::new();

    ancestors(f.tree.get(f.equals).expect("root"), |expr| {
        seen.push(expr.id());
        true
    });

    assert!(seen.is_empty());
}

#[test]
fn ancestors_stop_early_and_iterator_matches() {
    let (tree, root) = and_chain(5);
    let leaf = tree.get(root).expect("root").descendants_post_order()[0];
    assert_eq!(leaf.depth(), 4);
    assert_eq!(leaf.root().id(), root);

    let mut seen = 0;
    let outcome = ancestors(leaf, |_| {
        seen += 1;
        seen < 2
    });
    assert_eq!(outcome, WalkOutcome::Stopped);
    assert_eq!(seen, 2);

    let chain = leaf.ancestors().map(|e| e.id()).collect::<Vec<_>>();
    assert_eq!(chain.len(), 4);
    assert_eq!(chain.last(), Some(&root));
}

#[test]
fn walks_are_counted() {
    metrics_reset_all();

    let f = equals_fixture();
    let root = f.tree.get(f.equals).expect("root");
    post_order(root, |_| true);
    post_order(root, |_| false);
    ancestors(f.tree.get(f.field).expect("field"), |_| true);

    let ops = metrics_report().ops;
    assert_eq!(ops.post_order_walks, 2);
    assert_eq!(ops.ancestor_walks, 1);
    assert_eq!(ops.walks_stopped, 1);
    assert_eq!(ops.nodes_visited, 3 + 1 + 1);
}
