//! Scrolling log view, newest line at the bottom

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::events::LogLine;
use crate::tui::theme::{log_style, Styles};

pub fn render_log(f: &mut Frame, area: Rect, lines: &[LogLine]) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = lines.len().saturating_sub(visible);

    let rendered: Vec<Line> = lines[start..]
        .iter()
        .map(|line| {
            let (style, marker) = log_style(line.level);
            Line::from(vec![
                Span::styled(marker, style),
                Span::styled(line.to_string(), style),
            ])
        })
        .collect();

    let title = if start > 0 {
        format!("LOG ({} earlier)", start)
    } else {
        "LOG".to_string()
    };

    let log = Paragraph::new(rendered).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(title),
    );
    f.render_widget(log, area);
}
