//! Scroll event fan-out.
//!
//! The rendering surface accepts exactly one scroll listener, and the list occupies
//! it. [`ScrollEventMulticaster`] is that listener: it relays every event to an ordered
//! set of sub-listeners, the pagination controller among them.

use crate::layout::VisibilityWindow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Coarse scroll phase reported by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    /// Not scrolling.
    #[default]
    Idle,
    /// Scrolling under direct user input.
    Dragging,
    /// Scrolling on momentum, no user input.
    Settling,
}

/// One scroll delta and the visible extent after it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    /// Horizontal delta.
    pub dx: i32,
    /// Vertical delta.
    pub dy: i32,
    /// Visible extent after the scroll, `None` when no layout strategy is attached.
    pub window: Option<VisibilityWindow>,
}

impl ScrollEvent {
    /// Event for a `dx`/`dy` delta that left `window` visible.
    pub fn new(dx: i32, dy: i32, window: Option<VisibilityWindow>) -> Self {
        Self { dx, dy, window }
    }
}

/// Receiver of scroll events. Both callbacks default to doing nothing.
pub trait ScrollListener {
    /// The surface scrolled by `event.dx`/`event.dy`.
    fn on_scrolled(&mut self, _event: &ScrollEvent) {}

    /// The scroll phase changed.
    fn on_scroll_state_changed(&mut self, _state: ScrollState) {}
}

/// Listener handle shared between the caller and the multicaster.
pub type SharedScrollListener = Rc<RefCell<dyn ScrollListener>>;

/// Relays scroll events to an ordered set of listeners.
///
/// Membership is by identity: adding a listener twice keeps one entry, removing an
/// absent listener does nothing. Delivery follows insertion order.
#[derive(Default)]
pub struct ScrollEventMulticaster {
    listeners: Vec<SharedScrollListener>,
}

impl ScrollEventMulticaster {
    /// Create a multicaster with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener` at the end. Returns `false` if it was already present.
    pub fn add(&mut self, listener: SharedScrollListener) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        trace!(listeners = self.listeners.len(), "Scroll listener added");
        true
    }

    /// Remove `listener`. Returns `false` if it was absent.
    pub fn remove(&mut self, listener: &SharedScrollListener) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        before != self.listeners.len()
    }

    /// Check if `listener` is registered.
    pub fn contains(&self, listener: &SharedScrollListener) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver a scroll event to every listener, in insertion order.
    ///
    /// Iterates a snapshot, so listeners added or removed during delivery take effect
    /// from the next event.
    pub fn dispatch_scrolled(&self, event: &ScrollEvent) {
        for listener in self.listeners.clone() {
            listener.borrow_mut().on_scrolled(event);
        }
    }

    /// Deliver a scroll phase change to every listener, in insertion order.
    pub fn dispatch_state_changed(&self, state: ScrollState) {
        for listener in self.listeners.clone() {
            listener.borrow_mut().on_scroll_state_changed(state);
        }
    }
}

impl fmt::Debug for ScrollEventMulticaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollEventMulticaster")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn same_listener(a: &SharedScrollListener, b: &SharedScrollListener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
