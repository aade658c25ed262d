//! Batch upscaler screen: form, progress, log

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::tui::upscale_app::UpscaleApp;
use crate::tui::widgets::{render_log, render_progress, render_shortcuts, standard_shortcuts};

use super::{render_overlay, render_title};

pub fn render(f: &mut Frame, app: &UpscaleApp) {
    let state = &app.session.state;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                 // Title
            Constraint::Length(app.form.height()), // Settings
            Constraint::Length(4),                 // Gauge + status
            Constraint::Min(5),                    // Log
            Constraint::Length(1),                 // Shortcuts
        ])
        .split(f.area());

    render_title(f, chunks[0], "Real-ESRGAN Batch", state.worker);
    app.form.render(f, chunks[1], "SETTINGS");
    render_progress(
        f,
        chunks[2],
        state.percent,
        &state.status,
        state.worker.is_busy(),
        app.tick,
    );
    render_log(f, chunks[3], &state.log);
    render_shortcuts(
        f,
        chunks[4],
        &standard_shortcuts(state.start_enabled, state.stop_enabled),
    );

    render_overlay(f, &app.session);
}
