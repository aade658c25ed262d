//! Progress events emitted by background workers (consumed by the TUI)

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// Timestamp format used for log lines shown in the UI and written to run logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log line. Drives how the log view marks the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single timestamped line for the log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub text: String,
}

impl LogLine {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.text)
    }
}

/// Result of processing one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded { output: PathBuf },
    /// `error` is the captured error text and may be empty. `code` is the
    /// exit code, if the process ran and exited normally.
    Failed { error: String, code: Option<i32> },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded { .. })
    }

    /// Human-readable failure reason for the UI log
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            ItemOutcome::Succeeded { .. } => None,
            ItemOutcome::Failed { error, .. } if !error.is_empty() => Some(error.clone()),
            ItemOutcome::Failed { code: Some(code), .. } => {
                Some(format!("exited with code {}", code))
            }
            ItemOutcome::Failed { code: None, .. } => Some("terminated by signal".to_string()),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Completed,
    Cancelled,
    Failed,
}

impl TerminalState {
    pub fn label(&self) -> &'static str {
        match self {
            TerminalState::Completed => "Completed",
            TerminalState::Cancelled => "Cancelled",
            TerminalState::Failed => "Failed",
        }
    }
}

/// Aggregate result of one worker run. Built once the loop exits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Work items known at the start of the run
    pub total: usize,
    /// Work items actually attempted
    pub processed: usize,
    /// Work items that succeeded
    pub succeeded: usize,
    /// Terminal status text for the status label
    pub status: String,
}

impl RunSummary {
    /// The closing line written to run logs: `Summary: <success>/<total> succeeded`
    pub fn line(&self) -> String {
        format!("Summary: {}/{} succeeded", self.succeeded, self.total)
    }
}

/// Everything a worker can tell the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Append a line to the log view.
    Log(LogLine),

    /// Replace the "current status" label.
    Status(String),

    /// Overall progress through the run.
    Progress { processed: usize, total: usize },

    /// One work item has been handled (1-based index).
    ItemFinished {
        index: usize,
        total: usize,
        outcome: ItemOutcome,
    },

    /// Normalized recognition text from one capture cycle.
    Preview(String),

    /// First pattern match of a watch run.
    MatchFound(String),

    /// The run is over. Published exactly once per run.
    Finished {
        state: TerminalState,
        summary: RunSummary,
    },
}

impl ProgressEvent {
    pub fn info(text: impl Into<String>) -> Self {
        ProgressEvent::Log(LogLine::new(LogLevel::Info, text))
    }

    pub fn success(text: impl Into<String>) -> Self {
        ProgressEvent::Log(LogLine::new(LogLevel::Success, text))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        ProgressEvent::Log(LogLine::new(LogLevel::Warning, text))
    }

    pub fn error(text: impl Into<String>) -> Self {
        ProgressEvent::Log(LogLine::new(LogLevel::Error, text))
    }

    /// Whole-number percentage, 0 when the total is unknown or zero
    pub fn percent(processed: usize, total: usize) -> u16 {
        if total == 0 {
            return 0;
        }
        ((processed.min(total) * 100) / total) as u16
    }
}
