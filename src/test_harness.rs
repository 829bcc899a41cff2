//! Shared fixtures for whitebox tests.
//!
//! - [`TestRows`]: in-memory provider with stable ids and change notifications
//! - [`ScriptedPager`]: pager whose answers and received loads are shared with the test
//! - [`buffer_to_string`]: ratatui buffer flattening for snapshots

use crate::model::{Direction, RowType};
use crate::pager::Pager;
use crate::provider::{ChangeLog, ChangeNotifier, DataProvider};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Empty lines are removed to keep snapshots clean.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Provider over a vector of ids. Row `i` displays `"row <id>"`.
#[derive(Debug, Default)]
pub struct TestRows {
    ids: Vec<u64>,
    next_id: u64,
    notifier: ChangeNotifier,
}

impl TestRows {
    /// Provider with ids `0..count`.
    pub fn numbered(count: usize) -> Self {
        Self {
            ids: (0..count as u64).collect(),
            next_id: count as u64,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no rows are held.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add `count` fresh rows at the end.
    pub fn append(&mut self, count: usize) {
        let start = self.ids.len();
        self.insert(start, count);
    }

    /// Add `count` fresh rows at the front.
    pub fn prepend(&mut self, count: usize) {
        self.insert(0, count);
    }

    /// Add `count` fresh rows at `start`, which is clamped to the length.
    pub fn insert(&mut self, start: usize, count: usize) {
        let start = start.min(self.ids.len());
        let fresh: Vec<u64> = (self.next_id..self.next_id + count as u64).collect();
        self.next_id += count as u64;
        self.ids.splice(start..start, fresh);
        self.notifier.notify_range_inserted(start, count);
    }

    /// Remove up to `count` rows from `start`. Out-of-range requests shrink to fit.
    pub fn remove(&mut self, start: usize, count: usize) {
        let start = start.min(self.ids.len());
        let end = (start + count).min(self.ids.len());
        if end == start {
            return;
        }
        self.ids.drain(start..end);
        self.notifier.notify_range_removed(start, end - start);
    }
}

impl DataProvider for TestRows {
    type Row = String;

    fn count(&self) -> usize {
        self.ids.len()
    }

    fn stable_id(&self, position: usize) -> Option<u64> {
        self.ids.get(position).copied()
    }

    fn row_type(&self, position: usize) -> RowType {
        RowType::new((position % 2) as i32)
    }

    fn has_stable_ids(&self) -> bool {
        true
    }

    fn create(&mut self, _row_type: RowType) -> String {
        String::new()
    }

    fn bind(&mut self, row: &mut String, position: usize) {
        *row = match self.ids.get(position) {
            Some(id) => format!("row {id}"),
            None => String::new(),
        };
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

/// Pager whose answers and received loads are shared with the test.
#[derive(Clone, Default)]
pub struct ScriptedPager {
    allow_next: Rc<Cell<bool>>,
    allow_prev: Rc<Cell<bool>>,
    loads: Rc<RefCell<Vec<Direction>>>,
    witness: Rc<RefCell<Option<Rc<ChangeLog>>>>,
    witnessed: Rc<RefCell<Vec<usize>>>,
}

impl ScriptedPager {
    /// Pager that always agrees to load, both directions.
    pub fn allowing_both() -> Self {
        let pager = Self::default();
        pager.allow(Direction::Next, true);
        pager.allow(Direction::Prev, true);
        pager
    }

    /// Change the answer of `should_load(direction)`.
    pub fn allow(&self, direction: Direction, allowed: bool) {
        match direction {
            Direction::Next => self.allow_next.set(allowed),
            Direction::Prev => self.allow_prev.set(allowed),
        }
    }

    /// Directions passed to `load`, in call order.
    pub fn loads(&self) -> Vec<Direction> {
        self.loads.borrow().clone()
    }

    /// On every `load`, record how many events `log` holds at that moment.
    pub fn record_log_len_on_load(&self, log: Rc<ChangeLog>) -> Rc<RefCell<Vec<usize>>> {
        *self.witness.borrow_mut() = Some(log);
        Rc::clone(&self.witnessed)
    }
}

impl Pager for ScriptedPager {
    fn should_load(&self, direction: Direction) -> bool {
        match direction {
            Direction::Next => self.allow_next.get(),
            Direction::Prev => self.allow_prev.get(),
        }
    }

    fn load(&mut self, direction: Direction) {
        self.loads.borrow_mut().push(direction);
        if let Some(log) = self.witness.borrow().as_ref() {
            self.witnessed.borrow_mut().push(log.len());
        }
    }
}
