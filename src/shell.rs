//! UI-side state machine shared by both front-ends
//!
//! [`ShellState`] holds only what the screen needs to draw. It is mutated from
//! worker activity exclusively through [`ShellState::apply`], which the
//! [`Session`] calls for each event it drains on the UI tick. Workers never
//! see any of this.

use std::fmt;

use crate::bridge::{self, EventDrain, Publisher};
use crate::cancel::CancellationFlag;
use crate::events::{LogLine, ProgressEvent, RunSummary, TerminalState};
use crate::worker::{RunOutcome, StartError, WorkerSlot};

/// Lifecycle as the UI sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl WorkerState {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkerState::Running)
    }
}

impl From<TerminalState> for WorkerState {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Completed => WorkerState::Completed,
            TerminalState::Cancelled => WorkerState::Cancelled,
            TerminalState::Failed => WorkerState::Failed,
        }
    }
}

/// Render state for one application window.
#[derive(Debug, Clone)]
pub struct ShellState {
    pub worker: WorkerState,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub status: String,
    pub percent: u16,
    pub log: Vec<LogLine>,
    pub preview: String,
    pub found: Option<String>,
    pub last_summary: Option<RunSummary>,
}

impl ShellState {
    pub fn new(ready_status: impl Into<String>) -> Self {
        Self {
            worker: WorkerState::Idle,
            start_enabled: true,
            stop_enabled: false,
            status: ready_status.into(),
            percent: 0,
            log: Vec::new(),
            preview: String::new(),
            found: None,
            last_summary: None,
        }
    }

    /// UI action: a run was just spawned
    pub fn begin_run(&mut self, status: impl Into<String>) {
        self.worker = WorkerState::Running;
        self.start_enabled = false;
        self.stop_enabled = true;
        self.percent = 0;
        self.status = status.into();
        self.preview.clear();
        self.found = None;
        self.last_summary = None;
    }

    /// Apply one drained event.
    pub fn apply(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Log(line) => self.log.push(line),
            ProgressEvent::Status(text) => self.status = text,
            ProgressEvent::Progress { processed, total } => {
                self.percent = ProgressEvent::percent(processed, total);
            }
            ProgressEvent::ItemFinished { .. } => {}
            ProgressEvent::Preview(text) => self.preview = text,
            ProgressEvent::MatchFound(code) => {
                // at most one per run; keep the first
                if self.found.is_none() {
                    self.found = Some(code);
                }
            }
            ProgressEvent::Finished { state, summary } => {
                self.worker = state.into();
                self.status = summary.status.clone();
                self.last_summary = Some(summary);
                self.reset_controls();
            }
        }
    }

    fn reset_controls(&mut self) {
        self.start_enabled = true;
        self.stop_enabled = false;
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A blocking message box shown over the UI until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Bridge, worker slot and render state for one application instance.
pub struct Session {
    pub state: ShellState,
    pub notice: Option<Notice>,
    publisher: Publisher,
    drain: EventDrain,
    slot: WorkerSlot,
}

impl Session {
    pub fn new(ready_status: impl Into<String>) -> Self {
        let (publisher, drain) = bridge::channel();
        Self {
            state: ShellState::new(ready_status),
            notice: None,
            publisher,
            drain,
            slot: WorkerSlot::new(),
        }
    }

    /// Publisher for UI-originated log lines; shares the worker's FIFO.
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Drain everything queued and apply it. Returns how many events were applied.
    pub fn tick(&mut self) -> usize {
        let events = self.drain.drain_all();
        let count = events.len();
        for event in events {
            self.state.apply(event);
        }
        count
    }

    pub fn is_busy(&self) -> bool {
        self.state.worker.is_busy() || self.slot.is_running()
    }

    /// Spawn a worker unless one is already active.
    ///
    /// A rejected start leaves the running worker alone and raises an
    /// informational notice.
    pub fn start<F>(&mut self, name: &str, preparing: &str, body: F) -> Option<CancellationFlag>
    where
        F: FnOnce(&CancellationFlag, &Publisher) -> RunOutcome + Send + 'static,
    {
        if self.is_busy() {
            self.inform("Info", StartError::AlreadyRunning);
            return None;
        }

        match self.slot.start(name, self.publisher.clone(), body) {
            Ok(cancel) => {
                self.state.begin_run(preparing);
                Some(cancel)
            }
            Err(e) => {
                tracing::error!(error = %e, "could not start worker");
                self.show_error("Error", e);
                None
            }
        }
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn stop(&mut self) {
        if self.slot.request_stop() {
            self.publisher
                .publish(ProgressEvent::warning("Stop requested by user."));
        }
    }

    pub fn show_error(&mut self, title: &str, message: impl fmt::Display) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    pub fn inform(&mut self, title: &str, message: impl fmt::Display) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    /// Block until the worker thread exits (tests, orderly shutdown)
    pub fn wait_for_worker(&mut self) {
        self.slot.wait();
    }
}
