//! Bottom shortcut bar

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme::Styles;

pub struct Shortcut {
    pub key: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

impl Shortcut {
    pub fn new(key: &'static str, label: &'static str, enabled: bool) -> Self {
        Self { key, label, enabled }
    }
}

/// Shortcuts common to both front-ends
pub fn standard_shortcuts(start_enabled: bool, stop_enabled: bool) -> Vec<Shortcut> {
    vec![
        Shortcut::new("F5", "Start", start_enabled),
        Shortcut::new("F6", "Stop", stop_enabled),
        Shortcut::new("F8", "Clear Log", true),
        Shortcut::new("Tab", "Next field", true),
        Shortcut::new("←/→", "Change option", true),
        Shortcut::new("Esc", "Quit", true),
    ]
}

pub fn render_shortcuts(f: &mut Frame, area: Rect, shortcuts: &[Shortcut]) {
    let mut spans = Vec::new();
    for (i, shortcut) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Styles::secondary()));
        }
        let (key_style, label_style) = if shortcut.enabled {
            (Styles::emphasis(), Styles::primary())
        } else {
            (Styles::disabled(), Styles::disabled())
        };
        spans.push(Span::styled(shortcut.key, key_style));
        spans.push(Span::styled(format!(" {}", shortcut.label), label_style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
