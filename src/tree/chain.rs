//! Per-branch accumulation of names, paths, guards, and view steps.

use crate::route::{Guard, Route, ViewSource};
use smallvec::SmallVec;
use std::rc::Rc;

/// Maximum nesting depth before chain sequences spill to the heap.
/// Real route trees rarely nest past a handful of levels.
pub(crate) const MAX_INLINE_DEPTH: usize = 8;

/// Stack-allocated segment storage for one branch walk.
pub(crate) type SegmentVec = SmallVec<[String; MAX_INLINE_DEPTH]>;
/// Stack-allocated guard chain for one branch walk.
pub(crate) type GuardVec = SmallVec<[Guard; MAX_INLINE_DEPTH]>;
/// Stack-allocated view-step chain for one branch walk.
pub(crate) type StepVec<V> = SmallVec<[ViewSource<V>; MAX_INLINE_DEPTH]>;

/// Accumulated state of one tree-walk branch, root to the current node.
///
/// A chain is owned solely by the walk frame that created it: children
/// receive a copy, never a shared reference, so sibling branches cannot
/// observe each other's appends. Guard and loader handles are `Rc`, which
/// keeps the copy cheap.
pub(crate) struct Chain<V> {
    pub names: SegmentVec,
    pub path_segments: SegmentVec,
    pub guards: GuardVec,
    pub view_steps: StepVec<V>,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self {
            names: SegmentVec::new(),
            path_segments: SegmentVec::new(),
            guards: GuardVec::new(),
            view_steps: StepVec::new(),
        }
    }
}

impl<V: Clone> Clone for Chain<V> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            path_segments: self.path_segments.clone(),
            guards: self.guards.clone(),
            view_steps: self.view_steps.clone(),
        }
    }
}

impl<V: Clone> Chain<V> {
    /// Produce `node`'s accumulated chain: a copy of `parent`'s sequences
    /// (empty sequences when the node is a root) with the node's own
    /// name, path, guard, and view step appended, in that order.
    ///
    /// Pure transformation; `parent` is never mutated.
    pub fn accumulate(node: &Route<V>, parent: Option<&Chain<V>>) -> Chain<V> {
        let mut chain = parent.cloned().unwrap_or_default();
        if let Some(name) = &node.name {
            chain.names.push(name.clone());
        }
        if let Some(path) = &node.path {
            chain.path_segments.push(path.clone());
        }
        if let Some(guard) = &node.guard {
            chain.guards.push(Rc::clone(guard));
        }
        if let Some(view) = &node.view {
            chain.view_steps.push(view.clone());
        }
        chain
    }

    /// Dotted name of the branch so far (used in flatten-time errors).
    pub fn dotted_name(&self) -> String {
        self.names.join(".")
    }
}
