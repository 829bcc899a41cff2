//! Deferral of row-count mutations requested during a layout pass.
//!
//! Changing the number of rows while the rendering surface is computing its layout
//! corrupts that computation. Mutations requested inside a pass are queued and applied
//! at the next scheduler tick, first in first out.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Shared "layout in progress" flag.
///
/// The rendering surface enters the pass for the duration of its layout computation;
/// the list checks the flag before mutating its row count. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct LayoutPass {
    depth: Rc<Cell<usize>>,
}

impl LayoutPass {
    /// Create a flag with no pass in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a layout pass as in progress until the guard drops. Passes may nest.
    pub fn enter(&self) -> LayoutPassGuard {
        self.depth.set(self.depth.get() + 1);
        LayoutPassGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    /// Check if a layout pass is in progress.
    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

/// RAII guard returned by [`LayoutPass::enter`].
#[derive(Debug)]
#[must_use = "the layout pass ends when the guard is dropped"]
pub struct LayoutPassGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for LayoutPassGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// FIFO queue of deferred mutations.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    pending: VecDeque<T>,
}

impl<T> DeferredQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Queue a mutation behind every pending one.
    pub fn push(&mut self, mutation: T) {
        self.pending.push_back(mutation);
    }

    /// Take every pending mutation, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pending.drain(..)
    }

    /// Number of pending mutations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every pending mutation.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_active_while_guard_lives() {
        let pass = LayoutPass::new();
        assert!(!pass.is_active());
        {
            let _guard = pass.enter();
            assert!(pass.is_active());
        }
        assert!(!pass.is_active());
    }

    #[test]
    fn clones_share_the_flag() {
        let pass = LayoutPass::new();
        let surface_side = pass.clone();
        let guard = surface_side.enter();
        assert!(pass.is_active());
        drop(guard);
        assert!(!pass.is_active());
    }

    #[test]
    fn nested_passes_end_with_outermost_guard() {
        let pass = LayoutPass::new();
        let outer = pass.enter();
        let inner = pass.enter();
        drop(inner);
        assert!(pass.is_active());
        drop(outer);
        assert!(!pass.is_active());
    }

    #[test]
    fn queue_drains_in_fifo_order() {
        let mut queue = DeferredQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.len(), 3);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_pending_mutations() {
        let mut queue = DeferredQueue::new();
        queue.push("a");
        queue.clear();
        assert!(queue.is_empty());
    }
}
