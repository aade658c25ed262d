//! Modal notice box

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::shell::{Notice, NoticeKind};
use crate::tui::theme::Styles;

/// Rectangle of `percent_x` width and `height` rows centred in `area`
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(60, 7, f.area());
    let border = match notice.kind {
        NoticeKind::Info => Styles::border(),
        NoticeKind::Error => Styles::error(),
    };

    let body = vec![
        Line::from(Span::styled(notice.message.clone(), Styles::primary())),
        Line::from(""),
        Line::from(Span::styled("Enter / Esc to close", Styles::secondary())),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(notice.title.to_uppercase(), Styles::title())),
        ),
        area,
    );
}
