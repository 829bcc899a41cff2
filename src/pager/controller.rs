//! Scroll-driven pagination state machine.
//!
//! Each direction is either `IDLE` or `LOADING` (its refreshing flag). On a scroll
//! event an `IDLE` direction whose edge is within the threshold, and whose pager agrees,
//! moves to `LOADING`. Only the caller moves it back, by reporting completion.
//!
//! ```text
//! IDLE --(edge distance <= threshold && pager.should_load)--> LOADING
//! LOADING --(set_refreshing(direction, false))--> IDLE
//! ```
//!
//! The controller decides; the list applies. Fired directions are handed over through
//! [`PaginationController::take_triggered`] so the list can materialize the placeholder
//! before [`PaginationController::load`] invokes the pager.

use super::Pager;
use crate::layout::VisibilityWindow;
use crate::model::{Direction, RefreshingState, Threshold};
use crate::scroll::{ScrollEvent, ScrollListener};
use std::fmt;
use tracing::{debug, trace};

/// Per-attachment pagination state. Created when a pager is attached, dropped on detach.
pub struct PaginationController {
    pager: Box<dyn Pager>,
    threshold: Threshold,
    state: RefreshingState,
    triggered: Vec<Direction>,
}

impl PaginationController {
    /// Create an idle controller.
    pub fn new(pager: Box<dyn Pager>, threshold: Threshold) -> Self {
        Self {
            pager,
            threshold,
            state: RefreshingState::default(),
            triggered: Vec::new(),
        }
    }

    /// Edge distance that triggers a load.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Change the threshold. Applies from the next scroll event.
    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.threshold = threshold;
    }

    /// Refreshing flags of both directions.
    pub fn state(&self) -> RefreshingState {
        self.state
    }

    /// Check if `direction` is `LOADING`.
    pub fn is_refreshing(&self, direction: Direction) -> bool {
        self.state.get(direction)
    }

    /// Set the refreshing flag of `direction`.
    ///
    /// Returns `true` if the flag changed; setting the current value is a no-op.
    pub fn set_refreshing(&mut self, direction: Direction, refreshing: bool) -> bool {
        let changed = self.state.set(direction, refreshing);
        if changed {
            debug!(%direction, refreshing, "Refreshing flag changed");
        }
        changed
    }

    /// Decide which directions fire for `window`, moving them to `LOADING`.
    ///
    /// A direction fires when it is `IDLE`, its edge distance is at most the threshold
    /// (`<=`, not `<`), and the pager agrees. `Next` is evaluated before `Prev`.
    pub fn evaluate(&mut self, window: &VisibilityWindow) -> Vec<Direction> {
        let mut fired = Vec::new();
        for direction in Direction::ALL {
            if self.state.get(direction) {
                trace!(%direction, "Already loading, ignoring scroll");
                continue;
            }
            if !edge_reached(direction, window, self.threshold) {
                continue;
            }
            if !self.pager.should_load(direction) {
                trace!(%direction, "Pager declined");
                continue;
            }
            self.state.set(direction, true);
            debug!(%direction, ?window, threshold = self.threshold.get(), "Load triggered");
            fired.push(direction);
        }
        fired
    }

    /// Move `direction` to `LOADING` without a scroll event, if it is `IDLE` and the
    /// pager agrees.
    ///
    /// Returns `true` if the direction fired.
    pub fn request(&mut self, direction: Direction) -> bool {
        if self.state.get(direction) || !self.pager.should_load(direction) {
            return false;
        }
        self.state.set(direction, true);
        debug!(%direction, "Load requested");
        true
    }

    /// Invoke the pager for a direction that fired.
    pub fn load(&mut self, direction: Direction) {
        self.pager.load(direction);
    }

    /// Directions fired by scroll events since the last call, in firing order.
    pub fn take_triggered(&mut self) -> Vec<Direction> {
        std::mem::take(&mut self.triggered)
    }

    /// Return every direction to `IDLE`. Returns the state before the reset.
    pub fn reset(&mut self) -> RefreshingState {
        self.triggered.clear();
        std::mem::take(&mut self.state)
    }

    /// The attached pager.
    pub fn pager(&self) -> &dyn Pager {
        self.pager.as_ref()
    }

    /// Mutable access to the attached pager.
    pub fn pager_mut(&mut self) -> &mut dyn Pager {
        self.pager.as_mut()
    }
}

impl ScrollListener for PaginationController {
    fn on_scrolled(&mut self, event: &ScrollEvent) {
        if let Some(window) = event.window {
            let fired = self.evaluate(&window);
            self.triggered.extend(fired);
        }
    }
}

impl fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .field("triggered", &self.triggered)
            .finish_non_exhaustive()
    }
}

/// Edge-distance condition of `direction`.
///
/// - `Next`: `total_count - last_visible <= threshold`
/// - `Prev`: `first_visible - 0 <= threshold`
fn edge_reached(direction: Direction, window: &VisibilityWindow, threshold: Threshold) -> bool {
    let distance = match direction {
        Direction::Next => window.distance_to_end(),
        Direction::Prev => window.distance_to_start(),
    };
    distance.is_some_and(|distance| distance <= threshold.get())
}
