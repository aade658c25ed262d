//! Theme and styling for TUI - No colors, typography-based hierarchy

use ratatui::style::{Modifier, Style};

use crate::events::LogLevel;

/// Style definitions - using only typography (bold, underline, etc.)
pub struct Styles;

impl Styles {
    /// Main title style
    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Field labels, section headers
    pub fn header() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn primary() -> Style {
        Style::default()
    }

    /// Secondary/muted text style - dimmed
    pub fn secondary() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    pub fn emphasis() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Focused form row - reverse video
    pub fn selected() -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default()
    }

    pub fn success() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Warning style - bold + underlined
    pub fn warning() -> Style {
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Error style - bold + underlined + reversed so failures stand out
    pub fn error() -> Style {
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED | Modifier::REVERSED)
    }

    /// Disabled control
    pub fn disabled() -> Style {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    }
}

/// Style and gutter marker for a log line
pub fn log_style(level: LogLevel) -> (Style, &'static str) {
    match level {
        LogLevel::Info => (Styles::primary(), "  "),
        LogLevel::Success => (Styles::success(), "✔ "),
        LogLevel::Warning => (Styles::warning(), "! "),
        LogLevel::Error => (Styles::error(), "✖ "),
    }
}
