//! Terminal front-ends for the upscaler and the OCR watcher
//!
//! Both apps share one loop: poll the keyboard, drain the bridge, redraw.

pub mod form;
pub mod ocr_app;
pub mod screens;
pub mod theme;
pub mod upscale_app;
pub mod widgets;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::shell::Session;
use form::Form;

pub use ocr_app::OcrApp;
pub use upscale_app::UpscaleApp;

/// How often the bridge is drained and the screen redrawn
pub const TICK_RATE: Duration = Duration::from_millis(120);

/// One front-end window
pub trait TuiApp {
    fn session(&mut self) -> &mut Session;
    fn form(&mut self) -> &mut Form;
    /// Validate the form and spawn a worker
    fn start(&mut self);
    /// Called once per tick after the bridge was drained
    fn on_tick(&mut self);
    fn render(&self, f: &mut Frame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Route one key press
pub fn dispatch_key<A: TuiApp>(app: &mut A, key: KeyEvent) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    // a modal swallows everything until dismissed
    if app.session().notice.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
            app.session().dismiss_notice();
        }
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::F(5) => app.start(),
        KeyCode::F(6) => app.session().stop(),
        KeyCode::F(8) => app.session().state.clear_log(),
        _ => {
            app.form().handle_key(key);
        }
    }
    Flow::Continue
}

/// Drain pending events and advance the app's animation tick
pub fn tick<A: TuiApp>(app: &mut A) {
    app.session().tick();
    app.on_tick();
}

/// Run an app until the user quits. The terminal is restored on every exit
/// path, panics included.
pub fn run<A: TuiApp>(app: &mut A) -> Result<()> {
    let mut terminal = ratatui::try_init().context("Failed to initialise terminal")?;
    let result = event_loop(&mut terminal, app);
    ratatui::restore();

    // leave the worker to wind down on its own; the process is exiting
    if app.session().is_busy() {
        app.session().stop();
        tracing::info!("quit while a worker was running; stop requested");
    }
    result
}

fn event_loop<A: TuiApp>(terminal: &mut ratatui::DefaultTerminal, app: &mut A) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && dispatch_key(app, key) == Flow::Quit {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            tick(app);
            last_tick = Instant::now();
        }
    }
}
