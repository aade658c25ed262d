//! Cooperative cancellation shared between the UI thread and a worker
//!
//! The flag is only ever observed at iteration boundaries: a worker checks it
//! before starting the next work item and never interrupts a call in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop signal for one run.
///
/// Cloning hands out another handle to the same flag. Once set it stays set;
/// a new run gets a fresh flag from [`CancellationFlag::new`].
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    inner: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the worker stops before its next work item
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
