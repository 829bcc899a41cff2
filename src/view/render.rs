//! Frame rendering for the demo.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Text of the placeholder row.
pub const PLACEHOLDER_TEXT: &str = "Loading…";

/// One visible row, already bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Bound text.
    pub text: String,
    /// Styled as the loading row.
    pub placeholder: bool,
}

/// Everything one frame shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    /// Rows of each track, top to bottom.
    pub tracks: Vec<Vec<RenderedRow>>,
    /// Bottom status line.
    pub status: String,
}

/// Split `area` into the row area and the one-line status bar.
pub fn split(area: Rect) -> (Rect, Rect) {
    let [rows, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    (rows, status)
}

/// Draw `screen`: tracks side by side, status bar at the bottom.
pub fn render(frame: &mut Frame, screen: &Screen) {
    let (rows_area, status_area) = split(frame.area());

    let track_count = screen.tracks.len().max(1) as u32;
    let columns = Layout::horizontal(
        (0..track_count).map(|_| Constraint::Ratio(1, track_count)),
    )
    .split(rows_area);

    for (track, column) in screen.tracks.iter().zip(columns.iter()) {
        let lines: Vec<Line> = track.iter().map(row_line).collect();
        frame.render_widget(Paragraph::new(lines), *column);
    }

    frame.render_widget(
        Paragraph::new(screen.status.as_str()).style(Style::default().add_modifier(Modifier::REVERSED)),
        status_area,
    );
}

fn row_line(row: &RenderedRow) -> Line<'_> {
    if row.placeholder {
        Line::styled(row.text.as_str(), Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
    } else {
        Line::raw(row.text.as_str())
    }
}
