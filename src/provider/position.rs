//! Translation between public and augmented positions.
//!
//! Public positions index the caller's provider. Augmented positions index what the
//! rendering surface sees: the public rows plus an optional leading placeholder at
//! augmented index 0 and an optional trailing placeholder at the last augmented index.

use crate::model::Edge;

/// Which placeholder slots are currently materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceholderSlots {
    /// A placeholder occupies augmented index 0.
    pub leading: bool,
    /// A placeholder occupies the last augmented index.
    pub trailing: bool,
}

impl PlaceholderSlots {
    /// No placeholder rows.
    pub const NONE: Self = Self {
        leading: false,
        trailing: false,
    };

    /// Presence of the slot at `edge`.
    pub fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Leading => self.leading,
            Edge::Trailing => self.trailing,
        }
    }

    /// Copy with the slot at `edge` set to `present`.
    pub fn with(mut self, edge: Edge, present: bool) -> Self {
        match edge {
            Edge::Leading => self.leading = present,
            Edge::Trailing => self.trailing = present,
        }
        self
    }

    /// Number of materialized slots (0, 1 or 2).
    pub fn count(&self) -> usize {
        usize::from(self.leading) + usize::from(self.trailing)
    }

    /// Offset applied to public positions: 1 when a leading slot is present.
    pub fn leading_offset(&self) -> usize {
        usize::from(self.leading)
    }
}

/// What an augmented position addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A real row, at the given public position.
    Item(usize),
    /// A synthetic placeholder row.
    Placeholder(Edge),
}

impl Slot {
    /// Public position, or `None` for a placeholder.
    pub fn public(self) -> Option<usize> {
        match self {
            Slot::Item(position) => Some(position),
            Slot::Placeholder(_) => None,
        }
    }

    /// Check if this is a placeholder.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Slot::Placeholder(_))
    }
}

/// Pure index arithmetic for one `(slots, public_count)` snapshot.
///
/// # Invariants
/// - `augmented_count() == public_count + slots.count()`
/// - The leading placeholder, if present, is augmented index 0
/// - The trailing placeholder, if present, is augmented index `augmented_count() - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMapper {
    slots: PlaceholderSlots,
    public_count: usize,
}

impl PositionMapper {
    /// Create a mapper for the given snapshot.
    pub fn new(slots: PlaceholderSlots, public_count: usize) -> Self {
        Self {
            slots,
            public_count,
        }
    }

    /// Slots of this snapshot.
    pub fn slots(&self) -> PlaceholderSlots {
        self.slots
    }

    /// Number of public rows.
    pub fn public_count(&self) -> usize {
        self.public_count
    }

    /// Number of rows the rendering surface sees.
    pub fn augmented_count(&self) -> usize {
        self.public_count + self.slots.count()
    }

    /// Resolve an augmented position.
    ///
    /// Placeholder positions never reach the public provider. With both slots present
    /// and no public rows, positions 0 and 1 are both placeholders. Positions past
    /// the end are translated like any other row and left for the caller to reject.
    pub fn to_public(&self, augmented: usize) -> Slot {
        if self.slots.leading && augmented == 0 {
            return Slot::Placeholder(Edge::Leading);
        }
        if self.slots.trailing && augmented + 1 == self.augmented_count() {
            return Slot::Placeholder(Edge::Trailing);
        }
        Slot::Item(augmented - self.slots.leading_offset())
    }

    /// Augmented position of a public row.
    pub fn to_augmented(&self, public: usize) -> usize {
        public + self.slots.leading_offset()
    }

    /// Augmented position of the placeholder at `edge`, if that slot is present.
    pub fn placeholder_position(&self, edge: Edge) -> Option<usize> {
        if !self.slots.get(edge) {
            return None;
        }
        match edge {
            Edge::Leading => Some(0),
            Edge::Trailing => Some(self.augmented_count() - 1),
        }
    }
}
