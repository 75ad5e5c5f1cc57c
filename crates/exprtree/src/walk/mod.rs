//! Ready-made walks built on the visitor protocol.
//!
//! Walks are single synchronous passes. A walk stopped by its callback
//! cannot be resumed; start a new one from the root.

#[cfg(test)]
mod tests;

use crate::{
    config::WalkConfig,
    error::TraversalError,
    node::{Field, IsNull, Literal},
    obs::sink::{TreeEvent, WalkKind, WalkSpan, record},
    tree::{BinaryRef, ExprRef},
    visitor::Visitor,
};
use std::ops::ControlFlow;
use tracing::{debug, instrument};

///
/// WalkOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkOutcome {
    /// Every reachable node was handed to the callback.
    Completed,
    /// The callback returned `false`; remaining nodes were skipped.
    Stopped,
}

impl WalkOutcome {
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl From<ControlFlow<()>> for WalkOutcome {
    fn from(flow: ControlFlow<()>) -> Self {
        match flow {
            ControlFlow::Continue(()) => Self::Completed,
            ControlFlow::Break(()) => Self::Stopped,
        }
    }
}

/// Visit every node under `root` in post-order: left subtree, right
/// subtree, then the node itself. Returning `false` from `f` stops the walk
/// immediately.
#[instrument(name = "exprtree::walk::post_order", level = "trace", skip_all, fields(root = %root.id()))]
pub fn post_order<'t>(root: ExprRef<'t>, f: impl FnMut(ExprRef<'t>) -> bool) -> WalkOutcome {
    let mut walker = PostOrder {
        f,
        span: WalkSpan::new(WalkKind::PostOrder),
    };

    root.accept(&mut walker).into()
}

/// Post-order walk that first checks the subtree height against
/// `config.max_depth`, failing without visiting anything when it is
/// exceeded.
pub fn post_order_bounded<'t>(
    root: ExprRef<'t>,
    config: &WalkConfig,
    f: impl FnMut(ExprRef<'t>) -> bool,
) -> Result<WalkOutcome, TraversalError> {
    check_height(root, config)?;

    Ok(post_order(root, f))
}

/// Check the subtree height of `root` against the configured ceiling.
pub fn check_height(root: ExprRef<'_>, config: &WalkConfig) -> Result<(), TraversalError> {
    let Some(max) = config.max_depth else {
        return Ok(());
    };

    let height = root.height();
    if height > max {
        record(TreeEvent::DepthRejected { height, max });
        debug!(root = %root.id(), height, max, "expression exceeds walk depth limit");

        return Err(TraversalError::DepthExceeded { height, max });
    }

    Ok(())
}

/// Hand each ancestor of `expr` to `f`, nearest first, ending at the root.
/// `expr` itself is not visited.
#[instrument(name = "exprtree::walk::ancestors", level = "trace", skip_all, fields(start = %expr.id()))]
pub fn ancestors<'t>(expr: ExprRef<'t>, mut f: impl FnMut(ExprRef<'t>) -> bool) -> WalkOutcome {
    let mut span = WalkSpan::new(WalkKind::Ancestors);

    for ancestor in expr.ancestors() {
        span.visit();
        if !f(ancestor) {
            span.set_stopped();
            return WalkOutcome::Stopped;
        }
    }

    WalkOutcome::Completed
}

///
/// Ancestors
///
/// Iterator from a node's parent up to the root.
///

#[derive(Clone, Debug)]
pub struct Ancestors<'t> {
    next: Option<ExprRef<'t>>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = ExprRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();

        Some(current)
    }
}

impl<'t> ExprRef<'t> {
    #[must_use]
    pub fn ancestors(self) -> Ancestors<'t> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Topmost ancestor, or `self` for a root.
    #[must_use]
    pub fn root(self) -> Self {
        self.ancestors().last().unwrap_or(self)
    }

    /// Number of ancestors; zero for a root.
    #[must_use]
    pub fn depth(self) -> usize {
        self.ancestors().count()
    }

    /// Nodes on the longest path from `self` down to a leaf, inclusive.
    /// Computed without recursion so it is safe on unbounded input.
    #[must_use]
    pub fn height(self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 1_usize)];

        while let Some((expr, level)) = stack.pop() {
            height = height.max(level);
            if let Some(binary) = expr.as_binary() {
                stack.push((binary.right(), level + 1));
                stack.push((binary.left(), level + 1));
            }
        }

        height
    }

    /// Collect the subtree in post-order, `self` last.
    #[must_use]
    pub fn descendants_post_order(self) -> Vec<Self> {
        let mut out = Vec::new();
        post_order(self, |expr| {
            out.push(expr);
            true
        });

        out
    }
}

///
/// PostOrder
///
/// Visitor driving `post_order`. Every binary kind shares one rule:
/// children left to right, then the node.
///

struct PostOrder<F> {
    f: F,
    span: WalkSpan,
}

impl<'t, F> PostOrder<F>
where
    F: FnMut(ExprRef<'t>) -> bool,
{
    fn emit(&mut self, expr: ExprRef<'t>) -> ControlFlow<()> {
        self.span.visit();
        if (self.f)(expr) {
            ControlFlow::Continue(())
        } else {
            self.span.set_stopped();
            ControlFlow::Break(())
        }
    }

    fn binary(&mut self, expr: BinaryRef<'t>) -> ControlFlow<()> {
        expr.left().accept(self)?;
        expr.right().accept(self)?;

        self.emit(expr.expr())
    }
}

impl<'t, F> Visitor<'t> for PostOrder<F>
where
    F: FnMut(ExprRef<'t>) -> bool,
{
    type Output = ControlFlow<()>;

    fn visit_field(&mut self, expr: ExprRef<'t>, _: &'t Field) -> Self::Output {
        self.emit(expr)
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
        self.emit(expr)
    }

    fn visit_literal(&mut self, expr: ExprRef<'t>, _: &'t Literal) -> Self::Output {
        self.emit(expr)
    }

    fn visit_not(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_child(&mut self, expr: BinaryRef<'t>) -> Self::Output {
        self.binary(expr)
    }

    fn visit_is_null(&mut self, expr: ExprRef<'t>, _: &'t IsNull) -> Self::Output {
        self.emit(expr)
    }
}
