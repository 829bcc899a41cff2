//! Visibility extent of the rendered rows.
//!
//! The layout algorithm belongs to the rendering surface. This module only reads its
//! outcome: which augmented positions are currently visible. Layout strategies expose
//! one of two capabilities:
//! - single-track: one column, one first/last visible index
//! - multi-track: several columns (staggered grid), one first/last index per track
//!
//! [`VisibilityExtentResolver`] folds either capability into a single
//! `(first_visible, last_visible)` pair.

pub mod state;

pub use state::{LinearLayoutState, StaggeredLayoutState, TrackExtent};

use crate::model::{ConfigurationError, EndlessError};
use tracing::warn;

/// Layout with a single track of rows.
pub trait SingleTrackLayout {
    /// Augmented position of the first visible row.
    fn first_visible(&self) -> Option<usize>;
    /// Augmented position of the last visible row.
    fn last_visible(&self) -> Option<usize>;
}

/// Layout with several tracks of rows.
pub trait MultiTrackLayout {
    /// First visible augmented position of each track.
    fn first_visible_per_track(&self) -> Vec<Option<usize>>;
    /// Last visible augmented position of each track.
    fn last_visible_per_track(&self) -> Vec<Option<usize>>;
}

/// Visibility capability offered by a layout strategy.
pub enum LayoutCapability<'a> {
    /// One track.
    SingleTrack(&'a dyn SingleTrackLayout),
    /// Several tracks.
    MultiTrack(&'a dyn MultiTrackLayout),
    /// Neither: the list cannot page this layout.
    Unsupported,
}

/// Layout strategy attached to the rendering surface.
pub trait LayoutStrategy {
    /// Short name, used in diagnostics.
    fn name(&self) -> &str;

    /// Capability used to read the visible extent.
    ///
    /// Expected to stay the same kind for the life of the strategy. The list
    /// re-selects its resolver on the next scroll event if it does not.
    fn capability(&self) -> LayoutCapability<'_>;
}

/// Resolver flavour selected when the layout strategy is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Reads the single track directly.
    SingleTrack,
    /// Folds the per-track extents.
    MultiTrack,
}

/// Reports the first/last visible augmented position of a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityExtentResolver {
    kind: ResolverKind,
}

impl VisibilityExtentResolver {
    /// Select the resolver for `strategy`.
    ///
    /// # Errors
    /// [`ConfigurationError::UnsupportedLayout`] if the strategy is neither single-track
    /// nor multi-track.
    pub fn for_strategy(strategy: &dyn LayoutStrategy) -> Result<Self, EndlessError> {
        let kind = match strategy.capability() {
            LayoutCapability::SingleTrack(_) => ResolverKind::SingleTrack,
            LayoutCapability::MultiTrack(_) => ResolverKind::MultiTrack,
            LayoutCapability::Unsupported => {
                return Err(ConfigurationError::UnsupportedLayout {
                    kind: strategy.name().to_string(),
                }
                .into());
            }
        };
        Ok(Self { kind })
    }

    /// Flavour of this resolver.
    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    /// Check if `strategy` still offers the capability this resolver was selected for.
    pub fn matches(&self, strategy: &dyn LayoutStrategy) -> bool {
        matches!(
            (self.kind, strategy.capability()),
            (ResolverKind::SingleTrack, LayoutCapability::SingleTrack(_))
                | (ResolverKind::MultiTrack, LayoutCapability::MultiTrack(_))
        )
    }

    /// Most advanced visible position: the maximum over tracks.
    pub fn last_visible(&self, strategy: &dyn LayoutStrategy) -> Option<usize> {
        match (self.kind, strategy.capability()) {
            (ResolverKind::SingleTrack, LayoutCapability::SingleTrack(layout)) => {
                layout.last_visible()
            }
            (ResolverKind::MultiTrack, LayoutCapability::MultiTrack(layout)) => {
                layout.last_visible_per_track().into_iter().flatten().max()
            }
            _ => self.mismatch(strategy),
        }
    }

    /// Least advanced visible position: the minimum over tracks.
    pub fn first_visible(&self, strategy: &dyn LayoutStrategy) -> Option<usize> {
        match (self.kind, strategy.capability()) {
            (ResolverKind::SingleTrack, LayoutCapability::SingleTrack(layout)) => {
                layout.first_visible()
            }
            (ResolverKind::MultiTrack, LayoutCapability::MultiTrack(layout)) => {
                layout.first_visible_per_track().into_iter().flatten().min()
            }
            _ => self.mismatch(strategy),
        }
    }

    /// Snapshot the visible extent against `total_count` rows.
    pub fn window(&self, strategy: &dyn LayoutStrategy, total_count: usize) -> VisibilityWindow {
        VisibilityWindow {
            first_visible: self.first_visible(strategy),
            last_visible: self.last_visible(strategy),
            total_count,
        }
    }

    fn mismatch(&self, strategy: &dyn LayoutStrategy) -> Option<usize> {
        warn!(
            resolver = ?self.kind,
            layout = strategy.name(),
            "Layout strategy changed capability after attach"
        );
        None
    }
}

/// Visible extent recomputed for every scroll event. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityWindow {
    /// First visible augmented position, `None` when nothing is rendered.
    pub first_visible: Option<usize>,
    /// Last visible augmented position, `None` when nothing is rendered.
    pub last_visible: Option<usize>,
    /// Row count the edge distances are measured against.
    pub total_count: usize,
}

impl VisibilityWindow {
    /// Create a window from raw values.
    pub fn new(first_visible: Option<usize>, last_visible: Option<usize>, total_count: usize) -> Self {
        Self {
            first_visible,
            last_visible,
            total_count,
        }
    }

    /// Rows between the last visible row and the end: `total_count - last_visible`.
    ///
    /// With nothing rendered the distance is 0 for an empty list and unknown otherwise.
    pub fn distance_to_end(&self) -> Option<usize> {
        match self.last_visible {
            Some(last) => Some(self.total_count.saturating_sub(last)),
            None if self.total_count == 0 => Some(0),
            None => None,
        }
    }

    /// Rows between the start and the first visible row: `first_visible - 0`.
    ///
    /// With nothing rendered the distance is 0 for an empty list and unknown otherwise.
    pub fn distance_to_start(&self) -> Option<usize> {
        match self.first_visible {
            Some(first) => Some(first),
            None if self.total_count == 0 => Some(0),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flexbox;

    impl LayoutStrategy for Flexbox {
        fn name(&self) -> &str {
            "flexbox"
        }

        fn capability(&self) -> LayoutCapability<'_> {
            LayoutCapability::Unsupported
        }
    }

    mod resolver {
        use super::*;

        #[test]
        fn single_track_reads_extent_directly() {
            let layout = LinearLayoutState::new();
            layout.set_visible(3, 9);
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();

            assert_eq!(resolver.kind(), ResolverKind::SingleTrack);
            assert_eq!(resolver.first_visible(&layout), Some(3));
            assert_eq!(resolver.last_visible(&layout), Some(9));
        }

        #[test]
        fn multi_track_last_visible_is_maximum() {
            let layout = StaggeredLayoutState::new(3);
            layout.set_last_per_track(&[4, 7, 5]);
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();

            assert_eq!(resolver.kind(), ResolverKind::MultiTrack);
            assert_eq!(resolver.last_visible(&layout), Some(7));
        }

        #[test]
        fn multi_track_first_visible_is_minimum() {
            let layout = StaggeredLayoutState::new(3);
            layout.set_first_per_track(&[4, 1, 5]);
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();

            assert_eq!(resolver.first_visible(&layout), Some(1));
        }

        #[test]
        fn multi_track_ignores_empty_tracks() {
            let layout = StaggeredLayoutState::new(3);
            layout.set_track(0, TrackExtent::new(2, 6));
            layout.set_track(2, TrackExtent::new(3, 8));
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();

            assert_eq!(resolver.first_visible(&layout), Some(2));
            assert_eq!(resolver.last_visible(&layout), Some(8));
        }

        #[test]
        fn nothing_rendered_resolves_to_none() {
            let layout = StaggeredLayoutState::new(2);
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();
            assert_eq!(resolver.first_visible(&layout), None);
            assert_eq!(resolver.last_visible(&layout), None);
        }

        #[test]
        fn unsupported_layout_is_a_configuration_error() {
            let err = VisibilityExtentResolver::for_strategy(&Flexbox).unwrap_err();
            assert_eq!(
                err,
                EndlessError::Configuration(ConfigurationError::UnsupportedLayout {
                    kind: "flexbox".to_string()
                })
            );
        }

        #[test]
        fn mismatched_strategy_resolves_to_none() {
            let linear = LinearLayoutState::new();
            linear.set_visible(0, 4);
            let resolver = VisibilityExtentResolver::for_strategy(&linear).unwrap();
            let staggered = StaggeredLayoutState::new(2);
            staggered.set_last_per_track(&[1, 2]);

            assert_eq!(resolver.last_visible(&staggered), None);
            assert!(resolver.matches(&linear));
            assert!(!resolver.matches(&staggered));
            assert!(!resolver.matches(&Flexbox));
        }

        #[test]
        fn window_snapshots_extent_and_count() {
            let layout = LinearLayoutState::new();
            layout.set_visible(2, 5);
            let resolver = VisibilityExtentResolver::for_strategy(&layout).unwrap();

            assert_eq!(
                resolver.window(&layout, 10),
                VisibilityWindow::new(Some(2), Some(5), 10)
            );
        }
    }

    mod window {
        use super::*;

        #[test]
        fn distance_to_end_subtracts_last_visible() {
            assert_eq!(VisibilityWindow::new(Some(0), Some(8), 10).distance_to_end(), Some(2));
            assert_eq!(VisibilityWindow::new(Some(0), Some(9), 10).distance_to_end(), Some(1));
        }

        #[test]
        fn distance_to_end_saturates_past_the_end() {
            assert_eq!(VisibilityWindow::new(Some(0), Some(10), 10).distance_to_end(), Some(0));
        }

        #[test]
        fn distance_to_start_is_first_visible() {
            assert_eq!(VisibilityWindow::new(Some(3), Some(8), 10).distance_to_start(), Some(3));
        }

        #[test]
        fn empty_list_is_at_both_edges() {
            let window = VisibilityWindow::new(None, None, 0);
            assert_eq!(window.distance_to_end(), Some(0));
            assert_eq!(window.distance_to_start(), Some(0));
        }

        #[test]
        fn unrendered_rows_have_unknown_distance() {
            let window = VisibilityWindow::new(None, None, 12);
            assert_eq!(window.distance_to_end(), None);
            assert_eq!(window.distance_to_start(), None);
        }
    }
}
