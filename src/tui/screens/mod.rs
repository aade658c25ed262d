//! Screen rendering modules

pub mod ocr;
pub mod upscale;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::shell::{Session, WorkerState};
use crate::tui::theme::Styles;
use crate::tui::widgets::render_notice;

/// Title row: app name on the left, last run state on the right
pub fn render_title(f: &mut Frame, area: Rect, title: &str, worker: WorkerState) {
    let state = match worker {
        WorkerState::Idle => "ready",
        WorkerState::Running => "running",
        WorkerState::Completed => "completed",
        WorkerState::Cancelled => "cancelled",
        WorkerState::Failed => "failed",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", title), Styles::title()),
        Span::styled(format!(" [{}]", state), Styles::secondary()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Draw the modal notice, if any, over everything else
pub fn render_overlay(f: &mut Frame, session: &Session) {
    if let Some(notice) = &session.notice {
        render_notice(f, notice);
    }
}
