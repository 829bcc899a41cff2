//! Terminal demo of the endless list (impure shell).
//!
//! [`TuiApp`] plays the rendering surface: it owns the viewport geometry, records the
//! visible extent in the layout state while inside a [`crate::pager::LayoutPass`],
//! reports scrolls to the list and renders the bound rows.

mod render;
pub mod viewport;

pub use render::{RenderedRow, Screen, PLACEHOLDER_TEXT};
pub use viewport::Viewport;

use crate::config::{LayoutKind, ResolvedConfig};
use crate::demo::{DemoMessage, DemoPager, DemoProvider, PageBook};
use crate::layout::{LayoutStrategy, LinearLayoutState, StaggeredLayoutState, TrackExtent};
use crate::list::EndlessList;
use crate::model::{Direction, EndlessError};
use crate::provider::{ChangeLog, PlaceholderRenderer};
use crate::scroll::ScrollState;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Interval between ticks: completions, deferred mutations, idle relayout.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// The list rejected an operation
    #[error("List error: {0}")]
    List(#[from] EndlessError),
}

/// Visibility record the demo writes, matching the configured layout.
enum SurfaceLayout {
    Linear(Rc<LinearLayoutState>),
    Staggered(Rc<StaggeredLayoutState>),
}

impl SurfaceLayout {
    fn strategy(&self) -> Rc<dyn LayoutStrategy> {
        match self {
            Self::Linear(state) => state.clone(),
            Self::Staggered(state) => state.clone(),
        }
    }

    fn record(&self, extents: &[Option<(usize, usize)>]) {
        match self {
            Self::Linear(state) => match extents.first().copied().flatten() {
                Some((first, last)) => state.set_visible(first, last),
                None => state.clear(),
            },
            Self::Staggered(state) => {
                for (track, extent) in extents.iter().enumerate() {
                    let extent = extent
                        .map(|(first, last)| TrackExtent::new(first, last))
                        .unwrap_or_default();
                    state.set_track(track, extent);
                }
            }
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    list: EndlessList<DemoProvider>,
    viewport: Viewport,
    layout: SurfaceLayout,
    book: Rc<RefCell<PageBook>>,
    completions: Receiver<DemoMessage>,
    changes: Rc<ChangeLog>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, config)
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q, Esc or Ctrl+C).
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.tick()?;
        self.draw()?;

        loop {
            if event::poll(TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key)? {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => self.relayout()?,
                    _ => continue,
                }
            } else {
                self.tick()?;
            }
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the demo on any backend: provider with one page, pager, layout.
    pub fn with_terminal(terminal: Terminal<B>, config: &ResolvedConfig) -> Result<Self, TuiError> {
        let (sender, completions) = mpsc::channel();
        let book = Rc::new(RefCell::new(PageBook::new(
            config.total_pages,
            config.bidirectional,
        )));

        let mut list = EndlessList::new();
        list.set_threshold(config.threshold)?;
        if config.placeholder {
            list.set_placeholder_renderer(Some(PlaceholderRenderer::new(|| {
                PLACEHOLDER_TEXT.to_string()
            })));
        }
        let changes = ChangeLog::new();
        list.register_observer(changes.clone());
        list.set_data_provider(Some(DemoProvider::new(config.page_size)));

        let (layout, tracks) = match config.layout {
            LayoutKind::Linear => (SurfaceLayout::Linear(Rc::new(LinearLayoutState::new())), 1),
            LayoutKind::Staggered => (
                SurfaceLayout::Staggered(Rc::new(StaggeredLayoutState::new(config.tracks))),
                config.tracks,
            ),
        };
        list.set_layout_strategy(Some(layout.strategy()))?;
        list.set_pager(Some(Box::new(DemoPager::new(
            Rc::clone(&book),
            sender,
            Duration::from_millis(config.load_delay_ms),
        ))));

        info!(
            layout = %config.layout,
            tracks,
            page_size = config.page_size,
            bidirectional = config.bidirectional,
            "Demo initialized"
        );

        let app = Self {
            terminal,
            list,
            viewport: Viewport::new(tracks),
            layout,
            book,
            completions,
            changes,
        };
        app.changes.take();
        Ok(app)
    }

    /// The list under demonstration.
    pub fn list(&self) -> &EndlessList<DemoProvider> {
        &self.list
    }

    /// Scroll position and size of the row area.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Handle a key press. Returns `true` if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, TuiError> {
        let page = self.viewport.height().max(1) as i64;
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return Ok(true),
            (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(true)
            }
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.scroll_by(1)?,
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => self.scroll_by(-1)?,
            (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => self.scroll_by(page)?,
            (KeyCode::PageUp, _) => self.scroll_by(-page)?,
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.scroll_by(i64::MIN / 2)?,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.scroll_by(i64::MAX / 2)?,
            _ => {}
        }
        Ok(false)
    }

    /// Periodic work: apply deferred mutations, deliver finished loads, then lay out
    /// again so a viewport that is not full keeps loading.
    pub fn tick(&mut self) -> Result<(), TuiError> {
        self.list.run_deferred();
        while let Ok(DemoMessage::LoadCompleted(direction)) = self.completions.try_recv() {
            self.complete_load(direction)?;
        }
        self.relayout()
    }

    /// Deliver a page for `direction` and report the load as finished.
    pub fn complete_load(&mut self, direction: Direction) -> Result<(), TuiError> {
        self.book.borrow_mut().complete(direction);
        if let Some(rows) = self.list.data_mut() {
            match direction {
                Direction::Next => rows.append_page(),
                Direction::Prev => rows.prepend_page(),
            }
        }
        self.list.set_refreshing(direction, false)?;
        debug!(%direction, count = self.list.count(), "Page delivered");
        Ok(())
    }

    /// Scroll by `lines` and report it to the list from inside the layout pass.
    fn scroll_by(&mut self, lines: i64) -> Result<(), TuiError> {
        self.absorb_changes();
        let count = self.list.count();
        let moved = self.viewport.scroll_by(lines, count);
        if moved == 0 {
            return Ok(());
        }

        self.list.on_scroll_state_changed(ScrollState::Dragging);
        let dy = i32::try_from(moved * self.viewport.tracks() as i64).unwrap_or(i32::MAX);
        self.layout_and_report(dy)?;
        self.list.on_scroll_state_changed(ScrollState::Idle);
        Ok(())
    }

    /// Lay out without moving and report a zero scroll, like a surface does after
    /// its content changed.
    fn relayout(&mut self) -> Result<(), TuiError> {
        self.absorb_changes();
        self.layout_and_report(0)
    }

    fn layout_and_report(&mut self, dy: i32) -> Result<(), TuiError> {
        let height = match self.terminal.size() {
            Ok(size) => render::split(ratatui::layout::Rect::new(0, 0, size.width, size.height))
                .0
                .height as usize,
            Err(_) => self.viewport.height(),
        };
        self.viewport.set_height(height);

        let pass = self.list.layout_pass();
        let _guard = pass.enter();
        let count = self.list.count();
        self.viewport.clamp(count);
        self.layout.record(&self.viewport.track_extents(count));
        self.list.on_scrolled(0, dy)?;
        Ok(())
    }

    /// Apply list changes published since the last layout to the viewport anchor.
    fn absorb_changes(&mut self) {
        for event in self.changes.take() {
            self.viewport.apply_change(&event);
        }
        self.viewport.clamp(self.list.count());
    }

    /// Bind the visible rows through the augmented provider.
    fn screen(&mut self) -> Result<Screen, TuiError> {
        let count = self.list.count();
        let positions = self.viewport.track_positions(count);
        let mut tracks = Vec::with_capacity(positions.len());

        if let Some(provider) = self.list.provider_mut() {
            for track in positions {
                let mut rows = Vec::with_capacity(track.len());
                for position in track {
                    let mut row = provider.create(provider.row_type(position))?;
                    provider.bind(&mut row, position);
                    provider.on_row_attached(&mut row);
                    rows.push(RenderedRow {
                        text: row.view().clone(),
                        placeholder: row.is_placeholder(),
                    });
                    provider.on_row_detached(&mut row);
                    provider.on_row_recycled(&mut row);
                }
                tracks.push(rows);
            }
        }

        let public = self.list.data().map_or(0, DemoProvider::len);
        Ok(Screen {
            tracks,
            status: format!(
                "{public} rows | next: {} | prev: {}",
                direction_status(&self.list, Direction::Next),
                direction_status(&self.list, Direction::Prev)
            ),
        })
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        self.absorb_changes();
        let screen = self.screen()?;
        self.terminal.draw(|frame| render::render(frame, &screen))?;
        Ok(())
    }
}

fn direction_status(list: &EndlessList<DemoProvider>, direction: Direction) -> &'static str {
    if list.is_refreshing(direction) {
        "loading"
    } else {
        "idle"
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Render a single frame (test-only accessor)
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    /// Get reference to terminal (test-only accessor)
    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Pages accounted so far (test-only accessor)
    pub(crate) fn book(&self) -> PageBook {
        *self.book.borrow()
    }
}

/// Initialize and run the TUI application with a resolved configuration
///
/// Handles terminal setup, runs the event loop, and ensures cleanup on exit.
/// Logging must be initialized by the caller.
pub fn run_with_config(config: &ResolvedConfig) -> Result<(), TuiError> {
    let result = TuiApp::new(config).and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::buffer_to_string;
    use ratatui::backend::TestBackend;

    fn config(page_size: usize) -> ResolvedConfig {
        ResolvedConfig {
            page_size,
            load_delay_ms: 60_000,
            ..ResolvedConfig::default()
        }
    }

    fn app(width: u16, height: u16, config: &ResolvedConfig) -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TuiApp::with_terminal(terminal, config).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tui_error_from_io_error() {
        let tui_err: TuiError = io::Error::other("test error").into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn quit_keys() {
        let mut app = app(40, 8, &config(3));
        assert!(app.handle_key(key(KeyCode::Char('q'))).unwrap());
        assert!(app.handle_key(key(KeyCode::Esc)).unwrap());
        assert!(app
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap());
        assert!(!app.handle_key(key(KeyCode::Char('x'))).unwrap());
    }

    #[test]
    fn short_first_page_triggers_next_load() {
        let mut app = app(40, 6, &config(3));
        app.tick().unwrap();

        assert!(app.list().is_refreshing(Direction::Next));
        assert!(app.book().in_flight(Direction::Next));
        assert_eq!(app.list().count(), 3, "placeholder waits for the next tick");

        app.tick().unwrap();
        assert_eq!(app.list().count(), 4);
    }

    #[test]
    fn loading_row_renders_below_first_page() {
        let mut app = app(40, 6, &config(3));
        app.tick().unwrap();
        app.tick().unwrap();
        app.render_test().unwrap();

        let output = buffer_to_string(app.terminal().backend().buffer());
        insta::assert_snapshot!(output, @r"
          1  Measure twice, cut once
          2  Well begun is half done
          3  Practice makes perfect
        Loading…
        3 rows | next: loading | prev: idle
        ");
    }

    #[test]
    fn completed_load_replaces_placeholder_with_page() {
        let mut app = app(40, 10, &config(3));
        app.tick().unwrap();
        app.tick().unwrap();
        app.complete_load(Direction::Next).unwrap();

        assert!(!app.list().is_refreshing(Direction::Next));
        assert_eq!(app.list().count(), 6);
        assert_eq!(app.book().loaded(Direction::Next), 2);
    }

    #[test]
    fn scrolling_to_the_end_loads_next_page() {
        let mut cfg = config(20);
        cfg.threshold = 2;
        let mut app = app(40, 6, &cfg);
        app.tick().unwrap();
        assert!(!app.list().is_refreshing(Direction::Next));

        app.handle_key(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(app.viewport().top(), 15);
        assert!(app.list().is_refreshing(Direction::Next));
    }

    #[test]
    fn bidirectional_demo_loads_previous_page_at_top() {
        let mut cfg = config(20);
        cfg.bidirectional = true;
        let mut app = app(40, 6, &cfg);
        app.tick().unwrap();

        assert!(app.list().is_refreshing(Direction::Prev));
        app.tick().unwrap();
        app.complete_load(Direction::Prev).unwrap();
        assert_eq!(app.list().data().map(DemoProvider::len), Some(40));
    }

    #[test]
    fn staggered_demo_renders_columns() {
        let cfg = ResolvedConfig {
            layout: LayoutKind::Staggered,
            tracks: 2,
            placeholder: false,
            ..config(4)
        };
        let mut app = app(40, 4, &cfg);
        app.tick().unwrap();
        app.render_test().unwrap();

        let output = buffer_to_string(app.terminal().backend().buffer());
        let first_line = output.lines().next().unwrap_or_default();
        assert!(first_line.starts_with("  1  Measure"));
        assert!(first_line.contains("  2  Well"));
    }
}
