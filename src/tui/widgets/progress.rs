//! Progress gauge with the status label underneath

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::tui::theme::Styles;

/// Spinner frames for animation
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// Renders a 3-row gauge and a 1-row status label. `area` needs 4 rows.
pub fn render_progress(f: &mut Frame, area: Rect, percent: u16, status: &str, busy: bool, tick: u64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title("PROGRESS"),
        )
        .gauge_style(Styles::emphasis())
        .percent(percent.min(100));
    f.render_widget(gauge, chunks[0]);

    render_status(f, chunks[1], status, busy, tick);
}

/// Single status line, with a spinner while a worker is active
pub fn render_status(f: &mut Frame, area: Rect, status: &str, busy: bool, tick: u64) {
    let prefix = if busy { spinner(tick) } else { " " };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", prefix), Styles::emphasis()),
        Span::styled(status.to_string(), Styles::primary()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
