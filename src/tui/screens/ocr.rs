//! OCR watcher screen: form, live preview, match, log

use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::ocr_app::OcrApp;
use crate::tui::theme::Styles;
use crate::tui::widgets::{render_log, render_shortcuts, render_status, standard_shortcuts};

use super::{render_overlay, render_title};

pub fn render(f: &mut Frame, app: &OcrApp) {
    let state = &app.session.state;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                 // Title
            Constraint::Length(app.form.height()), // Settings
            Constraint::Length(1),                 // Status
            Constraint::Length(3),                 // Last recognized text
            Constraint::Length(3),                 // Match
            Constraint::Min(4),                    // Log
            Constraint::Length(1),                 // Shortcuts
        ])
        .split(f.area());

    render_title(f, chunks[0], "Screen OCR Watcher", state.worker);
    app.form.render(f, chunks[1], "SETTINGS");
    render_status(f, chunks[2], &state.status, state.worker.is_busy(), app.tick);

    let preview_text = if state.preview.is_empty() {
        Span::styled("(nothing recognized yet)", Styles::secondary())
    } else {
        Span::styled(state.preview.clone(), Styles::primary())
    };
    let preview = Paragraph::new(Line::from(preview_text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title("LAST SCAN"),
        );
    f.render_widget(preview, chunks[3]);

    let found = match &state.found {
        Some(code) => Span::styled(format!(" {} ", code), Styles::selected()),
        None => Span::styled("(none yet)", Styles::secondary()),
    };
    let result = Paragraph::new(Line::from(found)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title("MATCH"),
    );
    f.render_widget(result, chunks[4]);

    render_log(f, chunks[5], &state.log);
    render_shortcuts(
        f,
        chunks[6],
        &standard_shortcuts(state.start_enabled, state.stop_enabled),
    );

    render_overlay(f, &app.session);
}
