//! Pagination: when to ask the caller for more rows.
//!
//! The caller supplies a [`Pager`], the policy deciding whether a direction can load
//! and how to start loading it. [`PaginationController`] watches scroll events and
//! invokes the pager at most once per approach to an edge.

pub mod controller;
pub mod deferred;

pub use controller::PaginationController;
pub use deferred::{DeferredQueue, LayoutPass, LayoutPassGuard};

use crate::model::Direction;

/// Caller-supplied pagination policy.
///
/// `load` starts the caller's asynchronous work and returns immediately. When the
/// work finishes, successfully or not, the caller reports it with
/// `EndlessList::set_refreshing(direction, false)`.
pub trait Pager {
    /// Whether rows can be loaded in `direction` right now.
    fn should_load(&self, direction: Direction) -> bool;

    /// Start loading rows in `direction`.
    fn load(&mut self, direction: Direction);
}

/// Single-direction pager that only ever appends.
pub trait NextPager {
    /// Whether the next page can be loaded right now.
    fn should_load(&self) -> bool;

    /// Start loading the next page.
    fn load_next_page(&mut self);
}

/// Adapts a [`NextPager`] to [`Pager`]. Never loads `Prev`.
#[derive(Debug)]
pub struct ForwardOnly<P>(pub P);

impl<P: NextPager> Pager for ForwardOnly<P> {
    fn should_load(&self, direction: Direction) -> bool {
        direction == Direction::Next && self.0.should_load()
    }

    fn load(&mut self, direction: Direction) {
        if direction == Direction::Next {
            self.0.load_next_page();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pages {
        loads: usize,
    }

    impl NextPager for Pages {
        fn should_load(&self) -> bool {
            true
        }

        fn load_next_page(&mut self) {
            self.loads += 1;
        }
    }

    #[test]
    fn forward_only_never_loads_prev() {
        let mut pager = ForwardOnly(Pages::default());
        assert!(pager.should_load(Direction::Next));
        assert!(!pager.should_load(Direction::Prev));

        pager.load(Direction::Prev);
        assert_eq!(pager.0.loads, 0);

        pager.load(Direction::Next);
        assert_eq!(pager.0.loads, 1);
    }
}
