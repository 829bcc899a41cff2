//! The endless list: the rendering-surface-facing shell.
//!
//! [`EndlessList`] owns everything the surface talks to:
//! - the [`AugmentedDataProvider`] wrapping the caller's rows
//! - the layout strategy and its [`VisibilityExtentResolver`]
//! - the [`ScrollEventMulticaster`] occupying the surface's only scroll-listener slot
//! - the [`PaginationController`] while a pager is attached
//!
//! Row-count mutations requested while a [`LayoutPass`] is active are queued and
//! applied by [`EndlessList::run_deferred`] at the surface's next tick. Placeholder
//! renderer swaps share that queue, so a laid-out placeholder row can always be built.

use crate::layout::{LayoutStrategy, VisibilityExtentResolver, VisibilityWindow};
use crate::model::{ConfigurationError, Direction, Edge, EndlessError, RefreshingState, Threshold};
use crate::pager::{DeferredQueue, LayoutPass, PaginationController, Pager};
use crate::provider::{
    AugmentedDataProvider, ChangeEvent, DataObserver, DataProvider, PlaceholderRenderer,
};
use crate::scroll::{ScrollEvent, ScrollEventMulticaster, ScrollState, SharedScrollListener};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

/// Provider change waiting for the end of a layout pass.
enum PendingMutation<R> {
    Slot { edge: Edge, present: bool },
    Renderer(Option<PlaceholderRenderer<R>>),
}

impl<R> fmt::Debug for PendingMutation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot { edge, present } => f
                .debug_struct("Slot")
                .field("edge", edge)
                .field("present", present)
                .finish(),
            Self::Renderer(renderer) => f.debug_tuple("Renderer").field(renderer).finish(),
        }
    }
}

struct AttachedLayout {
    strategy: Rc<dyn LayoutStrategy>,
    resolver: VisibilityExtentResolver,
}

/// Endless (paginated) list over a caller's [`DataProvider`].
pub struct EndlessList<P: DataProvider> {
    provider: Option<AugmentedDataProvider<P>>,
    observers: Vec<Rc<dyn DataObserver>>,
    layout: Option<AttachedLayout>,
    multicaster: ScrollEventMulticaster,
    controller: Option<Rc<RefCell<PaginationController>>>,
    threshold: Threshold,
    renderer: Option<PlaceholderRenderer<P::Row>>,
    layout_pass: LayoutPass,
    deferred: DeferredQueue<PendingMutation<P::Row>>,
}

impl<P: DataProvider> EndlessList<P> {
    /// Create a list with no provider, layout or pager.
    pub fn new() -> Self {
        Self {
            provider: None,
            observers: Vec::new(),
            layout: None,
            multicaster: ScrollEventMulticaster::new(),
            controller: None,
            threshold: Threshold::default(),
            renderer: None,
            layout_pass: LayoutPass::new(),
            deferred: DeferredQueue::new(),
        }
    }

    // ===== Data provider =====

    /// Attach `provider`, or detach the current one with `None`.
    ///
    /// The previous provider is detached and handed back. The new one is wrapped in a
    /// fresh [`AugmentedDataProvider`] whose slots follow the current refreshing flags.
    /// Registered observers move to the new provider and receive `DataSetChanged`.
    /// Pending deferred mutations targeted the old provider and are dropped.
    pub fn set_data_provider(&mut self, provider: Option<P>) -> Option<P> {
        let previous = self.provider.take().map(|mut old| {
            for observer in &self.observers {
                old.notifier().unregister(observer);
            }
            old.on_detached();
            old.into_inner()
        });
        if !self.deferred.is_empty() {
            debug!(dropped = self.deferred.len(), "Dropping deferred mutations of replaced provider");
            self.deferred.clear();
        }

        match provider {
            Some(inner) => {
                let mut augmented = AugmentedDataProvider::new(inner, self.renderer.clone());
                let state = self.refreshing_state();
                for direction in Direction::ALL {
                    if state.get(direction) {
                        augmented.set_slot(direction.edge(), true);
                    }
                }
                for observer in &self.observers {
                    augmented.notifier().register(Rc::clone(observer));
                }
                augmented.on_attached();
                info!(count = augmented.count(), slots = ?augmented.slots(), "Data provider attached");
                augmented.notifier().notify_data_set_changed();
                self.provider = Some(augmented);
            }
            None => {
                debug!("Data provider detached");
                for observer in &self.observers {
                    observer.on_change(&ChangeEvent::DataSetChanged);
                }
            }
        }
        previous
    }

    /// The caller's provider.
    pub fn data(&self) -> Option<&P> {
        self.provider.as_ref().map(AugmentedDataProvider::inner)
    }

    /// Mutable access to the caller's provider. Its notifications reach observers shifted.
    pub fn data_mut(&mut self) -> Option<&mut P> {
        self.provider.as_mut().map(AugmentedDataProvider::inner_mut)
    }

    /// The augmented provider the rendering surface queries.
    pub fn provider(&self) -> Option<&AugmentedDataProvider<P>> {
        self.provider.as_ref()
    }

    /// Mutable access to the augmented provider, for row creation and binding.
    pub fn provider_mut(&mut self) -> Option<&mut AugmentedDataProvider<P>> {
        self.provider.as_mut()
    }

    /// Number of rows the surface lays out, placeholders included.
    pub fn count(&self) -> usize {
        self.provider.as_ref().map_or(0, AugmentedDataProvider::count)
    }

    /// Observe changes in augmented positions. The observer follows provider swaps.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_observer(&mut self, observer: Rc<dyn DataObserver>) -> bool {
        if self.observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        if let Some(provider) = &self.provider {
            provider.notifier().register(Rc::clone(&observer));
        }
        self.observers.push(observer);
        true
    }

    /// Stop observing. Returns `false` if the observer was not registered.
    pub fn unregister_observer(&mut self, observer: &Rc<dyn DataObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        if let Some(provider) = &self.provider {
            provider.notifier().unregister(observer);
        }
        before != self.observers.len()
    }

    // ===== Layout =====

    /// Attach a layout strategy, or detach it with `None`.
    ///
    /// # Errors
    /// [`ConfigurationError::UnsupportedLayout`] if the strategy is neither single-track
    /// nor multi-track. The previous strategy stays attached.
    pub fn set_layout_strategy(
        &mut self,
        strategy: Option<Rc<dyn LayoutStrategy>>,
    ) -> Result<(), EndlessError> {
        self.layout = match strategy {
            Some(strategy) => {
                let resolver = VisibilityExtentResolver::for_strategy(strategy.as_ref())?;
                debug!(layout = strategy.name(), kind = ?resolver.kind(), "Layout strategy attached");
                Some(AttachedLayout { strategy, resolver })
            }
            None => None,
        };
        Ok(())
    }

    /// Visible extent right now, measured against the caller's row count.
    ///
    /// `None` when no layout strategy is attached.
    pub fn visibility_window(&self) -> Option<VisibilityWindow> {
        let public_count = self.data().map_or(0, DataProvider::count);
        self.layout
            .as_ref()
            .map(|layout| layout.resolver.window(layout.strategy.as_ref(), public_count))
    }

    // ===== Scroll events =====

    /// Reserved: the list occupies the surface's only scroll-listener slot.
    ///
    /// # Errors
    /// Always [`EndlessError::UnsupportedOperation`]; use
    /// [`EndlessList::add_scroll_listener`].
    pub fn set_scroll_listener(&mut self, _listener: SharedScrollListener) -> Result<(), EndlessError> {
        Err(EndlessError::UnsupportedOperation {
            operation: "set_scroll_listener",
            hint: "use add_scroll_listener to observe scroll events",
        })
    }

    /// Receive scroll events after the list. Returns `false` if already added.
    pub fn add_scroll_listener(&mut self, listener: SharedScrollListener) -> bool {
        self.multicaster.add(listener)
    }

    /// Stop receiving scroll events. Returns `false` if the listener was absent.
    pub fn remove_scroll_listener(&mut self, listener: &SharedScrollListener) -> bool {
        self.multicaster.remove(listener)
    }

    /// The surface scrolled by `dx`/`dy`.
    ///
    /// Relays the event to every scroll listener, then loads the directions whose edge
    /// came within the threshold: materialize the placeholder, then invoke the pager.
    /// Listeners receive the event even when an error is returned, with no window.
    ///
    /// # Errors
    /// - [`ConfigurationError::UnsupportedLayout`] if the attached strategy no longer
    ///   offers a readable capability
    /// - [`ConfigurationError::MissingLayoutStrategy`] if a pager is attached without a
    ///   layout strategy
    pub fn on_scrolled(&mut self, dx: i32, dy: i32) -> Result<(), EndlessError> {
        let revalidated = self.revalidate_layout();
        let window = match &revalidated {
            Ok(()) => self.visibility_window(),
            Err(_) => None,
        };

        trace!(dx, dy, ?window, "Scrolled");
        self.multicaster
            .dispatch_scrolled(&ScrollEvent::new(dx, dy, window));

        revalidated?;
        if self.controller.is_some() && window.is_none() {
            return Err(ConfigurationError::MissingLayoutStrategy.into());
        }

        let Some(controller) = self.controller.clone() else {
            return Ok(());
        };
        let triggered = controller.borrow_mut().take_triggered();
        for direction in triggered {
            self.begin_load(&controller, direction);
        }
        Ok(())
    }

    /// The surface's scroll phase changed.
    pub fn on_scroll_state_changed(&mut self, state: ScrollState) {
        trace!(?state, "Scroll state changed");
        self.multicaster.dispatch_state_changed(state);
    }

    // ===== Pagination =====

    /// Attach a pager, or detach the current one with `None`.
    ///
    /// Detaching resets both directions to idle and removes their placeholders. A new
    /// pager starts idle with the current threshold.
    pub fn set_pager(&mut self, pager: Option<Box<dyn Pager>>) {
        if let Some(old) = self.controller.take() {
            let listener: SharedScrollListener = old.clone();
            self.multicaster.remove(&listener);
            let previous = old.borrow_mut().reset();
            for direction in Direction::ALL {
                if previous.get(direction) {
                    self.schedule_slot(direction.edge(), false);
                }
            }
            info!(?previous, "Pager detached");
        }

        if let Some(pager) = pager {
            let controller = Rc::new(RefCell::new(PaginationController::new(pager, self.threshold)));
            let listener: SharedScrollListener = controller.clone();
            self.multicaster.add(listener);
            self.controller = Some(controller);
            info!(threshold = self.threshold.get(), "Pager attached");
        }
    }

    /// Check if a pager is attached.
    pub fn has_pager(&self) -> bool {
        self.controller.is_some()
    }

    /// Set the edge distance, in rows, that triggers a load. Applies from the next
    /// scroll event and survives pager changes.
    ///
    /// # Errors
    /// [`EndlessError::InvalidArgument`] if `rows` is not positive. The previous
    /// threshold is kept.
    pub fn set_threshold(&mut self, rows: i64) -> Result<(), EndlessError> {
        let threshold = Threshold::new(rows)?;
        self.threshold = threshold;
        if let Some(controller) = &self.controller {
            controller.borrow_mut().set_threshold(threshold);
        }
        debug!(threshold = threshold.get(), "Threshold changed");
        Ok(())
    }

    /// Current threshold.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Configure the placeholder row constructor, or remove it with `None`.
    ///
    /// Slots of loading directions are inserted or removed to match. During a layout
    /// pass the provider keeps building placeholders with the old renderer until the
    /// queued slot removals are applied.
    pub fn set_placeholder_renderer(&mut self, renderer: Option<PlaceholderRenderer<P::Row>>) {
        let enabled = renderer.is_some();
        self.renderer = renderer;
        // The renderer is in place before any slot it builds, and outlives every slot
        // it built.
        if enabled {
            self.schedule(PendingMutation::Renderer(self.renderer.clone()));
        }
        let state = self.refreshing_state();
        for direction in Direction::ALL {
            if state.get(direction) {
                self.schedule_slot(direction.edge(), enabled);
            }
        }
        if !enabled {
            self.schedule(PendingMutation::Renderer(None));
        }
        debug!(enabled, "Placeholder renderer changed");
    }

    /// Set the refreshing flag of `direction`.
    ///
    /// `false` is how the caller reports a finished load, successful or not. Setting
    /// the current value does nothing.
    ///
    /// # Errors
    /// [`ConfigurationError::NoPager`] when setting `true` with no pager attached.
    /// Setting `false` with no pager is accepted and does nothing.
    pub fn set_refreshing(&mut self, direction: Direction, refreshing: bool) -> Result<(), EndlessError> {
        let Some(controller) = &self.controller else {
            if refreshing {
                return Err(ConfigurationError::NoPager.into());
            }
            trace!(%direction, "Completion without a pager ignored");
            return Ok(());
        };

        let changed = controller.borrow_mut().set_refreshing(direction, refreshing);
        if changed {
            let present = refreshing && self.renderer.is_some();
            self.schedule_slot(direction.edge(), present);
        }
        Ok(())
    }

    /// Check if `direction` is loading. Always `false` without a pager.
    pub fn is_refreshing(&self, direction: Direction) -> bool {
        self.controller
            .as_ref()
            .is_some_and(|controller| controller.borrow().is_refreshing(direction))
    }

    /// Refreshing flags of both directions.
    pub fn refreshing_state(&self) -> RefreshingState {
        self.controller
            .as_ref()
            .map(|controller| controller.borrow().state())
            .unwrap_or_default()
    }

    /// Load `direction` now, without waiting for a scroll event.
    ///
    /// Still gated: does nothing if the direction is loading or the pager declines.
    /// Returns `true` if the pager was invoked.
    ///
    /// # Errors
    /// [`ConfigurationError::NoPager`] if no pager is attached.
    pub fn request_load(&mut self, direction: Direction) -> Result<bool, EndlessError> {
        let controller = self
            .controller
            .clone()
            .ok_or(ConfigurationError::NoPager)?;
        let fired = controller.borrow_mut().request(direction);
        if fired {
            self.begin_load(&controller, direction);
        }
        Ok(fired)
    }

    // ===== Layout pass and deferral =====

    /// Flag the rendering surface raises while computing its layout.
    pub fn layout_pass(&self) -> LayoutPass {
        self.layout_pass.clone()
    }

    /// Apply mutations deferred during layout passes, oldest first.
    ///
    /// Returns the number of mutations applied. Does nothing while a pass is active.
    pub fn run_deferred(&mut self) -> usize {
        if self.layout_pass.is_active() || self.deferred.is_empty() {
            return 0;
        }
        let pending: Vec<_> = self.deferred.drain().collect();
        let applied = pending.len();
        for mutation in pending {
            self.apply(mutation);
        }
        debug!(applied, "Applied deferred mutations");
        applied
    }

    /// Check if mutations are waiting for [`EndlessList::run_deferred`].
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    fn begin_load(&mut self, controller: &Rc<RefCell<PaginationController>>, direction: Direction) {
        if self.renderer.is_some() {
            self.schedule_slot(direction.edge(), true);
        }
        controller.borrow_mut().load(direction);
    }

    fn schedule_slot(&mut self, edge: Edge, present: bool) {
        self.schedule(PendingMutation::Slot { edge, present });
    }

    /// Apply now, or queue behind pending mutations when a layout pass is active.
    fn schedule(&mut self, mutation: PendingMutation<P::Row>) {
        if self.layout_pass.is_active() || !self.deferred.is_empty() {
            trace!(?mutation, pending = self.deferred.len(), "Deferring provider mutation");
            self.deferred.push(mutation);
        } else {
            self.apply(mutation);
        }
    }

    fn apply(&mut self, mutation: PendingMutation<P::Row>) {
        let Some(provider) = &mut self.provider else {
            return;
        };
        match mutation {
            PendingMutation::Slot { edge, present } => {
                provider.set_slot(edge, present);
            }
            PendingMutation::Renderer(renderer) => provider.set_placeholder_renderer(renderer),
        }
    }

    /// Re-select the resolver if the strategy changed capability since it was attached.
    fn revalidate_layout(&mut self) -> Result<(), EndlessError> {
        let Some(layout) = &mut self.layout else {
            return Ok(());
        };
        if layout.resolver.matches(layout.strategy.as_ref()) {
            return Ok(());
        }
        let resolver = VisibilityExtentResolver::for_strategy(layout.strategy.as_ref())?;
        warn!(
            layout = layout.strategy.name(),
            from = ?layout.resolver.kind(),
            to = ?resolver.kind(),
            "Layout strategy changed capability, resolver re-selected"
        );
        layout.resolver = resolver;
        Ok(())
    }
}

impl<P: DataProvider> Default for EndlessList<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EndlessList<P>
where
    P: DataProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndlessList")
            .field("provider", &self.provider)
            .field("observers", &self.observers.len())
            .field("layout", &self.layout.as_ref().map(|l| l.resolver.kind()))
            .field("multicaster", &self.multicaster)
            .field("controller", &self.controller)
            .field("threshold", &self.threshold)
            .field("deferred", &self.deferred)
            .finish()
    }
}

fn same_observer(a: &Rc<dyn DataObserver>, b: &Rc<dyn DataObserver>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
