//! Data provider contract and change notifications.
//!
//! A [`DataProvider`] is the caller's list model: it answers count / identity / type
//! queries, builds and binds rows, and publishes [`ChangeEvent`]s through its
//! [`ChangeNotifier`]. The core never mutates a provider's data, it only observes and
//! forwards.
//!
//! [`AugmentedDataProvider`] decorates a provider with synthetic placeholder rows,
//! using [`PositionMapper`] for the index arithmetic.

pub mod augmented;
pub mod position;

pub use augmented::{AugmentedDataProvider, PlaceholderId, PlaceholderRenderer, PlaceholderRow, Row};
pub use position::{PlaceholderSlots, PositionMapper, Slot};

use crate::model::RowType;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Caller-supplied list model.
///
/// Positions are public positions: `0..count()`, never including placeholder rows.
/// Implementors publish every structural change through [`DataProvider::notifier`].
pub trait DataProvider {
    /// Row handle built by [`DataProvider::create`] and filled by [`DataProvider::bind`].
    type Row;

    /// Number of rows.
    fn count(&self) -> usize;

    /// Stable identity of the row at `position`, or `None` if the provider has no
    /// stable ids.
    fn stable_id(&self, _position: usize) -> Option<u64> {
        None
    }

    /// View type of the row at `position`. Must not be negative.
    fn row_type(&self, _position: usize) -> RowType {
        RowType::DEFAULT
    }

    /// Whether [`DataProvider::stable_id`] returns meaningful ids.
    fn has_stable_ids(&self) -> bool {
        false
    }

    /// Build an empty row of the given type.
    fn create(&mut self, row_type: RowType) -> Self::Row;

    /// Fill `row` with the data at `position`.
    fn bind(&mut self, row: &mut Self::Row, position: usize);

    /// The provider was attached to a list.
    fn on_attached(&mut self) {}

    /// The provider was detached from its list.
    fn on_detached(&mut self) {}

    /// A row built by this provider became visible.
    fn on_row_attached(&mut self, _row: &mut Self::Row) {}

    /// A row built by this provider stopped being visible.
    fn on_row_detached(&mut self, _row: &mut Self::Row) {}

    /// A row built by this provider went back to the recycling pool.
    fn on_row_recycled(&mut self, _row: &mut Self::Row) {}

    /// A row could not be recycled. Return `true` to recycle it anyway.
    fn on_failed_to_recycle(&mut self, _row: &mut Self::Row) -> bool {
        false
    }

    /// Channel on which this provider publishes its changes.
    fn notifier(&self) -> &ChangeNotifier;
}

/// Structural change of a provider, expressed in that provider's positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Everything may have changed.
    DataSetChanged,
    /// Rows `start..start + count` changed content but not identity.
    RangeChanged {
        /// First changed position.
        start: usize,
        /// Number of changed rows.
        count: usize,
    },
    /// `count` rows were inserted at `start`.
    RangeInserted {
        /// Position of the first inserted row.
        start: usize,
        /// Number of inserted rows.
        count: usize,
    },
    /// `count` rows were removed starting at `start`.
    RangeRemoved {
        /// Position of the first removed row.
        start: usize,
        /// Number of removed rows.
        count: usize,
    },
    /// `count` rows moved from `from` to `to`.
    RangeMoved {
        /// Original position.
        from: usize,
        /// New position.
        to: usize,
        /// Number of moved rows.
        count: usize,
    },
}

impl ChangeEvent {
    /// Translate every position of the event by `offset` rows.
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            ChangeEvent::DataSetChanged => ChangeEvent::DataSetChanged,
            ChangeEvent::RangeChanged { start, count } => ChangeEvent::RangeChanged {
                start: start + offset,
                count,
            },
            ChangeEvent::RangeInserted { start, count } => ChangeEvent::RangeInserted {
                start: start + offset,
                count,
            },
            ChangeEvent::RangeRemoved { start, count } => ChangeEvent::RangeRemoved {
                start: start + offset,
                count,
            },
            ChangeEvent::RangeMoved { from, to, count } => ChangeEvent::RangeMoved {
                from: from + offset,
                to: to + offset,
                count,
            },
        }
    }
}

/// Receiver of [`ChangeEvent`]s.
pub trait DataObserver {
    /// Called once per published event, in publication order.
    fn on_change(&self, event: &ChangeEvent);
}

/// Ordered set of observers.
///
/// Observers are compared by address, so registering the same `Rc` twice is a no-op.
/// Publication iterates over a snapshot, which lets observers register or unregister
/// while an event is being delivered.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: RefCell<Vec<Rc<dyn DataObserver>>>,
}

impl ChangeNotifier {
    /// Create a notifier with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer. Returns `false` if it was already registered.
    pub fn register(&self, observer: Rc<dyn DataObserver>) -> bool {
        let mut observers = self.observers.borrow_mut();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unregister(&self, observer: &Rc<dyn DataObserver>) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| !same_observer(o, observer));
        observers.len() != before
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Deliver `event` to every observer.
    pub fn notify(&self, event: ChangeEvent) {
        let snapshot: Vec<_> = self.observers.borrow().clone();
        for observer in snapshot {
            observer.on_change(&event);
        }
    }

    /// Publish [`ChangeEvent::DataSetChanged`].
    pub fn notify_data_set_changed(&self) {
        self.notify(ChangeEvent::DataSetChanged);
    }

    /// Publish [`ChangeEvent::RangeChanged`].
    pub fn notify_range_changed(&self, start: usize, count: usize) {
        self.notify(ChangeEvent::RangeChanged { start, count });
    }

    /// Publish [`ChangeEvent::RangeInserted`].
    pub fn notify_range_inserted(&self, start: usize, count: usize) {
        self.notify(ChangeEvent::RangeInserted { start, count });
    }

    /// Publish [`ChangeEvent::RangeRemoved`].
    pub fn notify_range_removed(&self, start: usize, count: usize) {
        self.notify(ChangeEvent::RangeRemoved { start, count });
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn same_observer(a: &Rc<dyn DataObserver>, b: &Rc<dyn DataObserver>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Observer that records every event it receives.
///
/// Handy for rendering surfaces that apply changes on their next frame, and for tests.
#[derive(Debug, Default)]
pub struct ChangeLog {
    events: RefCell<Vec<ChangeEvent>>,
}

impl ChangeLog {
    /// Create an empty log, ready to be registered.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Drain the recorded events, oldest first.
    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events not drained yet.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Check if there are no pending events.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl DataObserver for ChangeLog {
    fn on_change(&self, event: &ChangeEvent) {
        self.events.borrow_mut().push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_moves_every_position() {
        assert_eq!(
            ChangeEvent::RangeInserted { start: 3, count: 2 }.shifted(1),
            ChangeEvent::RangeInserted { start: 4, count: 2 }
        );
        assert_eq!(
            ChangeEvent::RangeMoved {
                from: 0,
                to: 5,
                count: 1
            }
            .shifted(1),
            ChangeEvent::RangeMoved {
                from: 1,
                to: 6,
                count: 1
            }
        );
        assert_eq!(
            ChangeEvent::DataSetChanged.shifted(1),
            ChangeEvent::DataSetChanged
        );
    }

    #[test]
    fn shifted_by_zero_is_identity() {
        let event = ChangeEvent::RangeRemoved { start: 7, count: 3 };
        assert_eq!(event.shifted(0), event);
    }

    #[test]
    fn register_is_idempotent() {
        let notifier = ChangeNotifier::new();
        let log = ChangeLog::new();
        let observer: Rc<dyn DataObserver> = log.clone();

        assert!(notifier.register(observer.clone()));
        assert!(!notifier.register(observer.clone()));
        assert_eq!(notifier.observer_count(), 1);

        notifier.notify_range_inserted(0, 1);
        assert_eq!(log.take(), vec![ChangeEvent::RangeInserted { start: 0, count: 1 }]);
    }

    #[test]
    fn unregister_absent_observer_is_noop() {
        let notifier = ChangeNotifier::new();
        let observer: Rc<dyn DataObserver> = ChangeLog::new();
        assert!(!notifier.unregister(&observer));
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn unregistered_observer_stops_receiving() {
        let notifier = ChangeNotifier::new();
        let log = ChangeLog::new();
        let observer: Rc<dyn DataObserver> = log.clone();
        notifier.register(observer.clone());
        assert!(notifier.unregister(&observer));

        notifier.notify_data_set_changed();
        assert!(log.is_empty());
    }

    #[test]
    fn observers_receive_events_in_registration_order() {
        struct Tagged {
            tag: u8,
            sink: Rc<RefCell<Vec<u8>>>,
        }
        impl DataObserver for Tagged {
            fn on_change(&self, _event: &ChangeEvent) {
                self.sink.borrow_mut().push(self.tag);
            }
        }

        let sink = Rc::new(RefCell::new(Vec::new()));
        let notifier = ChangeNotifier::new();
        for tag in [1, 2, 3] {
            notifier.register(Rc::new(Tagged {
                tag,
                sink: sink.clone(),
            }));
        }

        notifier.notify_range_changed(0, 1);
        assert_eq!(*sink.borrow(), vec![1, 2, 3]);
    }
}
