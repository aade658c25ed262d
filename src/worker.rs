//! Background worker lifecycle
//!
//! A [`WorkerSlot`] holds at most one running worker per application. The
//! worker body runs on its own named thread and reports through a
//! [`Publisher`]; the slot guarantees the terminal [`ProgressEvent::Finished`]
//! is published exactly once, even if the body panics.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::bridge::Publisher;
use crate::cancel::CancellationFlag;
use crate::events::{ProgressEvent, RunSummary, TerminalState};

/// Why a start request was refused.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("processing is already running")]
    AlreadyRunning,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// What a worker body hands back when its loop exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub state: TerminalState,
    pub summary: RunSummary,
}

impl RunOutcome {
    /// Setup failure before any work item was attempted
    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            state: TerminalState::Failed,
            summary: RunSummary {
                status: status.into(),
                ..RunSummary::default()
            },
        }
    }
}

struct ActiveRun {
    handle: JoinHandle<()>,
    cancel: CancellationFlag,
}

/// Owner of the (single) background worker for one application instance.
#[derive(Default)]
pub struct WorkerSlot {
    current: Option<ActiveRun>,
    active: Arc<AtomicBool>,
}

impl WorkerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True from a successful [`start`](Self::start) until just before the
    /// worker publishes its terminal event.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Spawn `body` on a fresh worker thread with a fresh cancellation flag.
    ///
    /// Refused with [`StartError::AlreadyRunning`] while a previous worker is
    /// still active; the existing worker is left untouched.
    pub fn start<F>(
        &mut self,
        name: &str,
        publisher: Publisher,
        body: F,
    ) -> Result<CancellationFlag, StartError>
    where
        F: FnOnce(&CancellationFlag, &Publisher) -> RunOutcome + Send + 'static,
    {
        if self.is_running() {
            return Err(StartError::AlreadyRunning);
        }

        let cancel = CancellationFlag::new();
        let worker_cancel = cancel.clone();
        let active = Arc::clone(&self.active);
        active.store(true, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    body(&worker_cancel, &publisher)
                }))
                .unwrap_or_else(|_| {
                    tracing::error!("worker thread panicked");
                    publisher.publish(ProgressEvent::error("Worker stopped unexpectedly."));
                    RunOutcome::failed("Worker stopped unexpectedly")
                });

                tracing::info!(
                    state = outcome.state.label(),
                    processed = outcome.summary.processed,
                    succeeded = outcome.summary.succeeded,
                    total = outcome.summary.total,
                    "worker finished"
                );
                active.store(false, Ordering::SeqCst);
                publisher.publish(ProgressEvent::Finished {
                    state: outcome.state,
                    summary: outcome.summary,
                });
            });

        match spawned {
            Ok(handle) => {
                self.current = Some(ActiveRun {
                    handle,
                    cancel: cancel.clone(),
                });
                Ok(cancel)
            }
            Err(e) => {
                self.active.store(false, Ordering::SeqCst);
                Err(StartError::Spawn(e))
            }
        }
    }

    /// Ask the running worker to stop at its next checkpoint.
    ///
    /// Returns false when nothing is running.
    pub fn request_stop(&self) -> bool {
        match &self.current {
            Some(run) if self.is_running() => {
                run.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Block until the current worker thread has exited. Used by tests and
    /// by callers that want a clean shutdown.
    pub fn wait(&mut self) {
        if let Some(run) = self.current.take() {
            let _ = run.handle.join();
        }
    }
}
