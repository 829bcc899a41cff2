//! Sample pager: simulated network pages delivered by a worker thread.

use crate::model::Direction;
use crate::pager::Pager;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Message sent from a load worker back to the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoMessage {
    /// A page for this direction is ready.
    LoadCompleted(Direction),
}

/// Page accounting shared by the pager and the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBook {
    total_pages: usize,
    bidirectional: bool,
    loaded_next: usize,
    loaded_prev: usize,
    in_flight_next: bool,
    in_flight_prev: bool,
}

impl PageBook {
    /// Book where the initial page counts as loaded in the `Next` direction.
    pub fn new(total_pages: usize, bidirectional: bool) -> Self {
        Self {
            total_pages,
            bidirectional,
            loaded_next: 1,
            loaded_prev: 0,
            in_flight_next: false,
            in_flight_prev: false,
        }
    }

    /// Pages loaded in `direction`.
    pub fn loaded(&self, direction: Direction) -> usize {
        match direction {
            Direction::Next => self.loaded_next,
            Direction::Prev => self.loaded_prev,
        }
    }

    /// Check if a load of `direction` is outstanding.
    pub fn in_flight(&self, direction: Direction) -> bool {
        match direction {
            Direction::Next => self.in_flight_next,
            Direction::Prev => self.in_flight_prev,
        }
    }

    /// Check if another page of `direction` may be requested.
    pub fn can_load(&self, direction: Direction) -> bool {
        let allowed = direction == Direction::Next || self.bidirectional;
        allowed && !self.in_flight(direction) && self.loaded(direction) < self.total_pages
    }

    /// Record a load request.
    pub fn start(&mut self, direction: Direction) {
        match direction {
            Direction::Next => self.in_flight_next = true,
            Direction::Prev => self.in_flight_prev = true,
        }
    }

    /// Record a delivered page.
    pub fn complete(&mut self, direction: Direction) {
        match direction {
            Direction::Next => {
                self.in_flight_next = false;
                self.loaded_next += 1;
            }
            Direction::Prev => {
                self.in_flight_prev = false;
                self.loaded_prev += 1;
            }
        }
    }
}

/// [`Pager`] that fakes latency with a sleeping worker thread per load.
pub struct DemoPager {
    book: Rc<RefCell<PageBook>>,
    sender: Sender<DemoMessage>,
    delay: Duration,
}

impl DemoPager {
    /// Pager over `book` that answers on `sender` after `delay`.
    pub fn new(book: Rc<RefCell<PageBook>>, sender: Sender<DemoMessage>, delay: Duration) -> Self {
        Self {
            book,
            sender,
            delay,
        }
    }
}

impl Pager for DemoPager {
    fn should_load(&self, direction: Direction) -> bool {
        self.book.borrow().can_load(direction)
    }

    fn load(&mut self, direction: Direction) {
        self.book.borrow_mut().start(direction);
        let sender = self.sender.clone();
        let delay = self.delay;
        info!(%direction, ?delay, "Loading page");

        thread::spawn(move || {
            thread::sleep(delay);
            // The UI may have quit in the meantime.
            if sender.send(DemoMessage::LoadCompleted(direction)).is_err() {
                debug!(%direction, "Load finished after the UI loop ended");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn forward_only_book_never_loads_prev() {
        let book = PageBook::new(3, false);
        assert!(book.can_load(Direction::Next));
        assert!(!book.can_load(Direction::Prev));
    }

    #[test]
    fn book_stops_at_total_pages() {
        let mut book = PageBook::new(2, true);
        book.start(Direction::Next);
        assert!(!book.can_load(Direction::Next), "one load at a time");
        book.complete(Direction::Next);
        assert_eq!(book.loaded(Direction::Next), 2);
        assert!(!book.can_load(Direction::Next));
        assert!(book.can_load(Direction::Prev));
    }

    #[test]
    fn load_reports_completion_over_channel() {
        let (tx, rx) = mpsc::channel();
        let book = Rc::new(RefCell::new(PageBook::new(5, true)));
        let mut pager = DemoPager::new(Rc::clone(&book), tx, Duration::ZERO);

        pager.load(Direction::Prev);
        assert!(book.borrow().in_flight(Direction::Prev));
        assert!(!pager.should_load(Direction::Prev));

        let message = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker should report");
        assert_eq!(message, DemoMessage::LoadCompleted(Direction::Prev));
    }
}
