//! Visibility records written by the rendering surface's layout pass.
//!
//! These are shared between the surface (writer, during layout) and the list (reader,
//! on scroll events), so they use interior mutability and are handed around as `Rc`.

use super::{LayoutCapability, LayoutStrategy, MultiTrackLayout, SingleTrackLayout};
use std::cell::{Cell, RefCell};

/// Visible extent of a single column of rows.
#[derive(Debug, Default)]
pub struct LinearLayoutState {
    first: Cell<Option<usize>>,
    last: Cell<Option<usize>>,
}

impl LinearLayoutState {
    /// Create a record with nothing visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record rows `first..=last` as visible.
    ///
    /// # Panics
    /// In debug builds, panics if `first > last`.
    pub fn set_visible(&self, first: usize, last: usize) {
        debug_assert!(first <= last, "first visible {first} after last visible {last}");
        self.first.set(Some(first));
        self.last.set(Some(last));
    }

    /// Record that nothing is visible.
    pub fn clear(&self) {
        self.first.set(None);
        self.last.set(None);
    }
}

impl SingleTrackLayout for LinearLayoutState {
    fn first_visible(&self) -> Option<usize> {
        self.first.get()
    }

    fn last_visible(&self) -> Option<usize> {
        self.last.get()
    }
}

impl LayoutStrategy for LinearLayoutState {
    fn name(&self) -> &str {
        "linear"
    }

    fn capability(&self) -> LayoutCapability<'_> {
        LayoutCapability::SingleTrack(self)
    }
}

/// Visible extent of one track of a staggered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackExtent {
    /// First visible augmented position in this track.
    pub first: Option<usize>,
    /// Last visible augmented position in this track.
    pub last: Option<usize>,
}

impl TrackExtent {
    /// Extent covering `first..=last`.
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: Some(first),
            last: Some(last),
        }
    }
}

/// Visible extents of a multi-track (staggered) layout.
#[derive(Debug)]
pub struct StaggeredLayoutState {
    tracks: RefCell<Vec<TrackExtent>>,
}

impl StaggeredLayoutState {
    /// Create a record with `track_count` empty tracks.
    pub fn new(track_count: usize) -> Self {
        Self {
            tracks: RefCell::new(vec![TrackExtent::default(); track_count]),
        }
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.borrow().len()
    }

    /// Record the extent of one track. Out-of-range tracks are ignored.
    pub fn set_track(&self, track: usize, extent: TrackExtent) {
        if let Some(slot) = self.tracks.borrow_mut().get_mut(track) {
            *slot = extent;
        }
    }

    /// Record the last visible position of each track, in track order.
    pub fn set_last_per_track(&self, last: &[usize]) {
        for (slot, position) in self.tracks.borrow_mut().iter_mut().zip(last) {
            slot.last = Some(*position);
        }
    }

    /// Record the first visible position of each track, in track order.
    pub fn set_first_per_track(&self, first: &[usize]) {
        for (slot, position) in self.tracks.borrow_mut().iter_mut().zip(first) {
            slot.first = Some(*position);
        }
    }

    /// Record that nothing is visible in any track.
    pub fn clear(&self) {
        for slot in self.tracks.borrow_mut().iter_mut() {
            *slot = TrackExtent::default();
        }
    }
}

impl MultiTrackLayout for StaggeredLayoutState {
    fn first_visible_per_track(&self) -> Vec<Option<usize>> {
        self.tracks.borrow().iter().map(|t| t.first).collect()
    }

    fn last_visible_per_track(&self) -> Vec<Option<usize>> {
        self.tracks.borrow().iter().map(|t| t.last).collect()
    }
}

impl LayoutStrategy for StaggeredLayoutState {
    fn name(&self) -> &str {
        "staggered"
    }

    fn capability(&self) -> LayoutCapability<'_> {
        LayoutCapability::MultiTrack(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_starts_with_nothing_visible() {
        let layout = LinearLayoutState::new();
        assert_eq!(layout.first_visible(), None);
        assert_eq!(layout.last_visible(), None);
    }

    #[test]
    fn linear_clear_forgets_extent() {
        let layout = LinearLayoutState::new();
        layout.set_visible(1, 4);
        layout.clear();
        assert_eq!(layout.last_visible(), None);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn linear_rejects_inverted_extent() {
        LinearLayoutState::new().set_visible(5, 2);
    }

    #[test]
    fn staggered_records_per_track_extents() {
        let layout = StaggeredLayoutState::new(3);
        layout.set_track(1, TrackExtent::new(4, 10));
        layout.set_track(7, TrackExtent::new(0, 1));

        assert_eq!(layout.track_count(), 3);
        assert_eq!(layout.first_visible_per_track(), vec![None, Some(4), None]);
        assert_eq!(layout.last_visible_per_track(), vec![None, Some(10), None]);
    }

    #[test]
    fn staggered_clear_resets_every_track() {
        let layout = StaggeredLayoutState::new(2);
        layout.set_last_per_track(&[3, 4]);
        layout.clear();
        assert_eq!(layout.last_visible_per_track(), vec![None, None]);
    }

    #[test]
    fn names_identify_layouts() {
        assert_eq!(LinearLayoutState::new().name(), "linear");
        assert_eq!(StaggeredLayoutState::new(2).name(), "staggered");
    }
}
