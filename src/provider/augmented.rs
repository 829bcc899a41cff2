//! Data provider decorator that injects placeholder rows.
//!
//! [`AugmentedDataProvider`] wraps a caller's [`DataProvider`] and answers every query
//! in augmented positions. Placeholder rows never reach the wrapped provider: they
//! have no stable id, a reserved row type, are built by the configured
//! [`PlaceholderRenderer`], and their lifecycle callbacks are intercepted.
//!
//! Change notifications of the wrapped provider are re-published on the decorator's
//! own [`ChangeNotifier`], shifted past the leading placeholder when one is present.

use super::position::{PlaceholderSlots, PositionMapper, Slot};
use super::{ChangeEvent, ChangeNotifier, DataObserver, DataProvider};
use crate::model::{ConfigurationError, Edge, EndlessError, RowType};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Builds the visual of the loading row.
///
/// Cheap to clone: clones share the same constructor.
pub struct PlaceholderRenderer<R>(Rc<dyn Fn() -> R>);

impl<R> PlaceholderRenderer<R> {
    /// Wrap a row constructor.
    pub fn new(render: impl Fn() -> R + 'static) -> Self {
        Self(Rc::new(render))
    }

    /// Build a fresh placeholder visual.
    pub fn render(&self) -> R {
        (self.0)()
    }
}

impl<R> Clone for PlaceholderRenderer<R> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<R> fmt::Debug for PlaceholderRenderer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaceholderRenderer")
    }
}

/// Identity of a placeholder row handed out by [`AugmentedDataProvider::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(u64);

/// Row handle of the synthetic loading row.
#[derive(Debug)]
pub struct PlaceholderRow<R> {
    id: PlaceholderId,
    view: R,
}

impl<R> PlaceholderRow<R> {
    /// Identity assigned at creation.
    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    /// Visual built by the placeholder renderer.
    pub fn view(&self) -> &R {
        &self.view
    }

    /// Mutable access to the visual.
    pub fn view_mut(&mut self) -> &mut R {
        &mut self.view
    }
}

/// Row handle seen by the rendering surface.
#[derive(Debug)]
pub enum Row<R> {
    /// Synthetic loading row, owned by the decorator.
    Placeholder(PlaceholderRow<R>),
    /// Row built by the wrapped provider.
    Item(R),
}

impl<R> Row<R> {
    /// Check if this is a placeholder row.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Row::Placeholder(_))
    }

    /// The wrapped provider's row, if this is one.
    pub fn as_item(&self) -> Option<&R> {
        match self {
            Row::Item(row) => Some(row),
            Row::Placeholder(_) => None,
        }
    }

    /// Mutable access to the wrapped provider's row, if this is one.
    pub fn as_item_mut(&mut self) -> Option<&mut R> {
        match self {
            Row::Item(row) => Some(row),
            Row::Placeholder(_) => None,
        }
    }

    /// The visual of this row, whichever kind it is.
    pub fn view(&self) -> &R {
        match self {
            Row::Item(row) => row,
            Row::Placeholder(placeholder) => placeholder.view(),
        }
    }
}

/// Re-publishes the wrapped provider's events in augmented positions.
struct ShiftingForwarder {
    slots: Rc<Cell<PlaceholderSlots>>,
    downstream: Rc<ChangeNotifier>,
}

impl DataObserver for ShiftingForwarder {
    fn on_change(&self, event: &ChangeEvent) {
        let shifted = event.shifted(self.slots.get().leading_offset());
        trace!(?event, ?shifted, "Forwarding provider change");
        self.downstream.notify(shifted);
    }
}

/// Decorator over a caller's [`DataProvider`] with optional placeholder rows.
///
/// # Invariants
/// - `count() == inner().count() + slots().count()`
/// - A slot is only materialized while a placeholder renderer is configured
/// - Events published on [`AugmentedDataProvider::notifier`] are in augmented positions
pub struct AugmentedDataProvider<P: DataProvider> {
    inner: P,
    slots: Rc<Cell<PlaceholderSlots>>,
    notifier: Rc<ChangeNotifier>,
    forwarder: Rc<dyn DataObserver>,
    renderer: Option<PlaceholderRenderer<P::Row>>,
    tracked: Vec<PlaceholderId>,
    next_placeholder_id: u64,
}

impl<P: DataProvider> AugmentedDataProvider<P> {
    /// Wrap `inner` and start observing its changes. No slot is materialized.
    pub fn new(inner: P, renderer: Option<PlaceholderRenderer<P::Row>>) -> Self {
        let slots = Rc::new(Cell::new(PlaceholderSlots::NONE));
        let notifier = Rc::new(ChangeNotifier::new());
        let forwarder: Rc<dyn DataObserver> = Rc::new(ShiftingForwarder {
            slots: Rc::clone(&slots),
            downstream: Rc::clone(&notifier),
        });
        inner.notifier().register(Rc::clone(&forwarder));

        Self {
            inner,
            slots,
            notifier,
            forwarder,
            renderer,
            tracked: Vec::new(),
            next_placeholder_id: 0,
        }
    }

    /// Stop observing the wrapped provider and hand it back.
    pub fn into_inner(self) -> P {
        self.inner.notifier().unregister(&self.forwarder);
        self.inner
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Mutable access to the wrapped provider. Its notifications keep flowing.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    /// Channel carrying changes in augmented positions.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Currently materialized slots.
    pub fn slots(&self) -> PlaceholderSlots {
        self.slots.get()
    }

    /// Index mapper for the current state.
    pub fn mapper(&self) -> PositionMapper {
        PositionMapper::new(self.slots.get(), self.inner.count())
    }

    /// Number of rows, placeholders included.
    pub fn count(&self) -> usize {
        self.mapper().augmented_count()
    }

    /// Stable id at an augmented position. Placeholders have none.
    pub fn stable_id(&self, position: usize) -> Option<u64> {
        match self.mapper().to_public(position) {
            Slot::Placeholder(_) => None,
            Slot::Item(public) => self.inner.stable_id(public),
        }
    }

    /// Row type at an augmented position.
    pub fn row_type(&self, position: usize) -> RowType {
        match self.mapper().to_public(position) {
            Slot::Placeholder(_) => RowType::PLACEHOLDER,
            Slot::Item(public) => self.inner.row_type(public),
        }
    }

    /// Mirrors the wrapped provider.
    pub fn has_stable_ids(&self) -> bool {
        self.inner.has_stable_ids()
    }

    /// Placeholder renderer in use, if any.
    pub fn placeholder_renderer(&self) -> Option<&PlaceholderRenderer<P::Row>> {
        self.renderer.as_ref()
    }

    /// Replace the placeholder renderer.
    ///
    /// Does not touch the slots: the owner reconciles them afterwards.
    pub fn set_placeholder_renderer(&mut self, renderer: Option<PlaceholderRenderer<P::Row>>) {
        self.renderer = renderer;
    }

    /// Build a row of the given type.
    ///
    /// The placeholder type is built by the placeholder renderer and tracked; every
    /// other type is built by the wrapped provider.
    ///
    /// # Errors
    /// [`ConfigurationError::NoPlaceholderRenderer`] if the placeholder type is
    /// requested without a renderer.
    pub fn create(&mut self, row_type: RowType) -> Result<Row<P::Row>, EndlessError> {
        if !row_type.is_placeholder() {
            return Ok(Row::Item(self.inner.create(row_type)));
        }

        let renderer = self
            .renderer
            .as_ref()
            .ok_or(ConfigurationError::NoPlaceholderRenderer)?;
        let id = PlaceholderId(self.next_placeholder_id);
        self.next_placeholder_id += 1;
        self.tracked.push(id);
        debug!(id = id.0, "Created placeholder row");

        Ok(Row::Placeholder(PlaceholderRow {
            id,
            view: renderer.render(),
        }))
    }

    /// Bind `row` to an augmented position. Placeholder positions carry no data.
    pub fn bind(&mut self, row: &mut Row<P::Row>, position: usize) {
        match (self.mapper().to_public(position), row) {
            (Slot::Placeholder(_), Row::Placeholder(placeholder)) => {
                if !self.tracked.contains(&placeholder.id) {
                    self.tracked.push(placeholder.id);
                }
            }
            (Slot::Placeholder(edge), Row::Item(_)) => {
                warn!(?edge, position, "Item row bound to a placeholder position");
            }
            (Slot::Item(public), Row::Item(item)) => self.inner.bind(item, public),
            (Slot::Item(public), Row::Placeholder(placeholder)) => {
                warn!(
                    id = placeholder.id.0,
                    public, "Placeholder row bound to an item position"
                );
            }
        }
    }

    /// The list attached this provider.
    pub fn on_attached(&mut self) {
        self.inner.on_attached();
    }

    /// The list detached this provider.
    pub fn on_detached(&mut self) {
        self.inner.on_detached();
    }

    /// A row became visible.
    pub fn on_row_attached(&mut self, row: &mut Row<P::Row>) {
        if let Row::Item(item) = row {
            self.inner.on_row_attached(item);
        }
    }

    /// A row stopped being visible.
    pub fn on_row_detached(&mut self, row: &mut Row<P::Row>) {
        if let Row::Item(item) = row {
            self.inner.on_row_detached(item);
        }
    }

    /// A row went back to the recycling pool.
    pub fn on_row_recycled(&mut self, row: &mut Row<P::Row>) {
        match row {
            Row::Item(item) => self.inner.on_row_recycled(item),
            Row::Placeholder(placeholder) => self.untrack(placeholder.id),
        }
    }

    /// A row could not be recycled. Placeholders are always recyclable.
    pub fn on_failed_to_recycle(&mut self, row: &mut Row<P::Row>) -> bool {
        match row {
            Row::Item(item) => self.inner.on_failed_to_recycle(item),
            Row::Placeholder(placeholder) => {
                self.untrack(placeholder.id);
                true
            }
        }
    }

    /// Check if `row` is a placeholder handed out by this decorator and still in use.
    pub fn is_tracked(&self, row: &Row<P::Row>) -> bool {
        match row {
            Row::Placeholder(placeholder) => self.tracked.contains(&placeholder.id),
            Row::Item(_) => false,
        }
    }

    /// Number of placeholder rows currently in use by the surface.
    pub fn tracked_placeholders(&self) -> usize {
        self.tracked.len()
    }

    /// Materialize or remove the placeholder slot at `edge`.
    ///
    /// Publishes one insertion or removal event at the slot's augmented position.
    /// Returns the published event, or `None` if nothing changed. A slot is never
    /// materialized without a placeholder renderer.
    pub fn set_slot(&mut self, edge: Edge, present: bool) -> Option<ChangeEvent> {
        let current = self.slots.get();
        if current.get(edge) == present {
            return None;
        }
        if present && self.renderer.is_none() {
            trace!(?edge, "No placeholder renderer, slot stays empty");
            return None;
        }

        let before = self.mapper();
        let event = match (edge, present) {
            (Edge::Leading, true) => ChangeEvent::RangeInserted { start: 0, count: 1 },
            (Edge::Leading, false) => ChangeEvent::RangeRemoved { start: 0, count: 1 },
            (Edge::Trailing, true) => ChangeEvent::RangeInserted {
                start: before.augmented_count(),
                count: 1,
            },
            (Edge::Trailing, false) => ChangeEvent::RangeRemoved {
                start: before.augmented_count() - 1,
                count: 1,
            },
        };

        self.slots.set(current.with(edge, present));
        debug!(?edge, present, ?event, "Placeholder slot changed");
        self.notifier.notify(event);
        Some(event)
    }

    fn untrack(&mut self, id: PlaceholderId) {
        self.tracked.retain(|tracked| *tracked != id);
    }
}

impl<P> fmt::Debug for AugmentedDataProvider<P>
where
    P: DataProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AugmentedDataProvider")
            .field("inner", &self.inner)
            .field("slots", &self.slots.get())
            .field("renderer", &self.renderer.is_some())
            .field("tracked", &self.tracked.len())
            .finish()
    }
}
