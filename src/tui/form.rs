//! Keyboard-driven configuration form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::Styles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice(&'static [&'static str]),
    Toggle,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }

    /// A choice field; an unknown `value` falls back to the first option
    pub fn choice(label: &'static str, options: &'static [&'static str], value: &str) -> Self {
        let value = options
            .iter()
            .find(|o| **o == value)
            .or_else(|| options.first())
            .map(|o| o.to_string())
            .unwrap_or_default();
        Self {
            label,
            value,
            kind: FieldKind::Choice(options),
        }
    }

    pub fn toggle(label: &'static str, on: bool) -> Self {
        Self {
            label,
            value: if on { "on" } else { "off" }.to_string(),
            kind: FieldKind::Toggle,
        }
    }

    pub fn is_on(&self) -> bool {
        self.value == "on"
    }

    fn cycle(&mut self, forward: bool) {
        match &self.kind {
            FieldKind::Choice(options) if !options.is_empty() => {
                let pos = options.iter().position(|o| *o == self.value).unwrap_or(0);
                let next = if forward {
                    (pos + 1) % options.len()
                } else {
                    (pos + options.len() - 1) % options.len()
                };
                self.value = options[next].to_string();
            }
            FieldKind::Toggle => {
                let on = !self.is_on();
                self.value = if on { "on" } else { "off" }.to_string();
            }
            _ => {}
        }
    }

    fn display_value(&self, focused: bool) -> String {
        match self.kind {
            FieldKind::Text if focused => format!("{}_", self.value),
            FieldKind::Text => self.value.clone(),
            FieldKind::Choice(_) => format!("< {} >", self.value),
            FieldKind::Toggle => format!("[{}]", if self.is_on() { "x" } else { " " }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn is_on(&self, index: usize) -> bool {
        self.fields.get(index).map(Field::is_on).unwrap_or(false)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Height needed to draw every field inside a bordered block
    pub fn height(&self) -> u16 {
        self.fields.len() as u16 + 2
    }

    /// Returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return true;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return true;
            }
            _ => {}
        }

        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };

        match (field.kind.clone(), key.code) {
            (FieldKind::Text, KeyCode::Char('u')) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                field.value.clear();
                true
            }
            (FieldKind::Text, KeyCode::Char(c)) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                field.value.push(c);
                true
            }
            (FieldKind::Text, KeyCode::Backspace) => {
                field.value.pop();
                true
            }
            (FieldKind::Choice(_) | FieldKind::Toggle, KeyCode::Right | KeyCode::Char(' ')) => {
                field.cycle(true);
                true
            }
            (FieldKind::Choice(_) | FieldKind::Toggle, KeyCode::Left) => {
                field.cycle(false);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, title: &str) {
        let label_width = self
            .fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let focused = i == self.focus;
                let value_style = if focused { Styles::selected() } else { Styles::primary() };
                Line::from(vec![
                    Span::styled(format!(" {:<width$}  ", field.label, width = label_width), Styles::header()),
                    Span::styled(field.display_value(focused), value_style),
                ])
            })
            .collect();

        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title(title.to_string()),
        );
        f.render_widget(form, area);
    }
}
