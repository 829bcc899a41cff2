//! Core value types shared by the provider, pager and list modules.

use super::error::EndlessError;
use std::fmt;

/// Direction in which the list can grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Append rows after the last one (scrolling towards the end).
    Next,
    /// Prepend rows before the first one (scrolling towards the start).
    Prev,
}

impl Direction {
    /// Both directions, `Next` first.
    pub const ALL: [Direction; 2] = [Direction::Next, Direction::Prev];

    /// Edge of the list where this direction's placeholder lives.
    pub fn edge(self) -> Edge {
        match self {
            Direction::Next => Edge::Trailing,
            Direction::Prev => Edge::Leading,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Next => f.write_str("next"),
            Direction::Prev => f.write_str("prev"),
        }
    }
}

/// Edge of the augmented index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Augmented index 0.
    Leading,
    /// Last augmented index.
    Trailing,
}

/// Edge distance, in rows, at which a load is triggered. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(usize);

impl Threshold {
    /// Default threshold: load when the edge row itself becomes visible.
    pub const DEFAULT: Self = Self(1);

    /// Smart constructor that rejects zero and negative values.
    pub fn new(rows: i64) -> Result<Self, EndlessError> {
        if rows <= 0 {
            return Err(EndlessError::invalid_argument(
                "threshold",
                format!("must be a positive number of rows, got {rows}"),
            ));
        }
        usize::try_from(rows)
            .map(Self)
            .map_err(|_| EndlessError::invalid_argument("threshold", format!("{rows} is too large")))
    }

    /// Get the raw row count.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// View type of a row, used by the rendering surface to pool rows.
///
/// Data providers use non-negative values. Negative values are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowType(i32);

impl RowType {
    /// Row type of a provider that only has one kind of row.
    pub const DEFAULT: Self = Self(0);

    /// Reserved row type of the synthetic loading row.
    pub const PLACEHOLDER: Self = Self(-1);

    /// Create a row type from its raw value.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn get(&self) -> i32 {
        self.0
    }

    /// Check if this is the reserved placeholder type.
    pub fn is_placeholder(&self) -> bool {
        *self == Self::PLACEHOLDER
    }
}

impl Default for RowType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// In-flight flags, one per direction.
///
/// `true` means the direction is `LOADING`: a load was requested and the caller
/// has not reported completion yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshingState {
    /// A `Next` load is outstanding.
    pub loading_next: bool,
    /// A `Prev` load is outstanding.
    pub loading_prev: bool,
}

impl RefreshingState {
    /// Flag for one direction.
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Next => self.loading_next,
            Direction::Prev => self.loading_prev,
        }
    }

    /// Set the flag for one direction.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, direction: Direction, refreshing: bool) -> bool {
        let slot = match direction {
            Direction::Next => &mut self.loading_next,
            Direction::Prev => &mut self.loading_prev,
        };
        let changed = *slot != refreshing;
        *slot = refreshing;
        changed
    }

    /// Check if any direction is loading.
    pub fn any(&self) -> bool {
        self.loading_next || self.loading_prev
    }
}
