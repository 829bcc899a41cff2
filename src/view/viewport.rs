//! Scroll geometry of the demo surface.
//!
//! Rows are tiled row-major over `tracks` columns: augmented position `p` sits in
//! track `p % tracks` on line `p / tracks`. A single track is the linear layout.

use crate::provider::ChangeEvent;

/// Visible window over the tiled rows, measured in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    height: usize,
    tracks: usize,
}

impl Viewport {
    /// Viewport at the top with no height yet.
    ///
    /// # Panics
    /// In debug builds, panics if `tracks` is zero.
    pub fn new(tracks: usize) -> Self {
        debug_assert!(tracks > 0, "a viewport needs at least one track");
        Self {
            top: 0,
            height: 0,
            tracks: tracks.max(1),
        }
    }

    /// First visible line.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Visible lines.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns the rows are dealt into.
    pub fn tracks(&self) -> usize {
        self.tracks
    }

    /// Resize to the terminal's row area.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Lines needed to show `count` rows.
    pub fn line_count(&self, count: usize) -> usize {
        count.div_ceil(self.tracks)
    }

    /// Largest `top` that still fills the viewport.
    pub fn max_top(&self, count: usize) -> usize {
        self.line_count(count).saturating_sub(self.height)
    }

    /// Keep `top` within bounds after the row count changed.
    pub fn clamp(&mut self, count: usize) {
        self.top = self.top.min(self.max_top(count));
    }

    /// Scroll by `lines` (negative is up). Returns the lines actually scrolled.
    pub fn scroll_by(&mut self, lines: i64, count: usize) -> i64 {
        let before = self.top as i64;
        let target = (before + lines).clamp(0, self.max_top(count) as i64);
        self.top = target as usize;
        target - before
    }

    /// Keep the top row in place across a change published by the list.
    ///
    /// Rows inserted or removed above the top shift it; changes at or below the top
    /// are simply revealed.
    pub fn apply_change(&mut self, event: &ChangeEvent) {
        let anchor = self.top * self.tracks;
        let shifted = match *event {
            ChangeEvent::RangeInserted { start, count } if start < anchor => anchor + count,
            ChangeEvent::RangeRemoved { start, count } if start < anchor => {
                anchor - count.min(anchor - start)
            }
            _ => anchor,
        };
        self.top = shifted / self.tracks;
    }

    /// First and last visible position of each track, `None` for empty tracks.
    pub fn track_extents(&self, count: usize) -> Vec<Option<(usize, usize)>> {
        let lines = self.line_count(count);
        let end_line = (self.top + self.height).min(lines);
        (0..self.tracks)
            .map(|track| {
                if end_line <= self.top {
                    return None;
                }
                let first = self.top * self.tracks + track;
                if first >= count {
                    return None;
                }
                let mut last = (end_line - 1) * self.tracks + track;
                if last >= count {
                    last -= self.tracks;
                }
                Some((first, last))
            })
            .collect()
    }

    /// Visible positions of each track, top to bottom.
    pub fn track_positions(&self, count: usize) -> Vec<Vec<usize>> {
        self.track_extents(count)
            .into_iter()
            .map(|extent| match extent {
                Some((first, last)) => (first..=last).step_by(self.tracks).collect(),
                None => Vec::new(),
            })
            .collect()
    }
}
