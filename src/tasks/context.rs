//! # Run context handed to a blocking task.
//!
//! [`TaskContext`] bundles the three signals a task body observes while it
//! runs on a worker thread:
//!
//! - a [`CancellationToken`] set when cancellation is requested
//! - an interrupt flag set when cancellation should break out of blocking work
//! - a [`ProgressSink`] relaying `init(max)` / `report(value)` to the presentation thread

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Progress message relayed from a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Range initialized with a raw maximum.
    Init(u64),
    /// Raw progress value.
    Report(u64),
}

/// Sending side of the progress relay.
///
/// Sends never block. After the receiver is gone (the decorator finished),
/// updates are dropped silently.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<mpsc::UnboundedSender<ProgressUpdate>>,
}

impl ProgressSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ProgressUpdate>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards every update.
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Declares the raw maximum of upcoming reports.
    pub fn init(&self, max: u64) {
        self.send(ProgressUpdate::Init(max));
    }

    /// Reports a raw progress value.
    pub fn report(&self, value: u64) {
        self.send(ProgressUpdate::Report(value));
    }

    fn send(&self, update: ProgressUpdate) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(update);
        }
    }
}

/// Context passed to [`Task::run`](crate::Task::run).
#[derive(Debug, Clone)]
pub struct TaskContext {
    token: CancellationToken,
    interrupt: Arc<AtomicBool>,
    progress: ProgressSink,
}

impl TaskContext {
    /// Creates a context from its parts.
    pub fn new(token: CancellationToken, interrupt: Arc<AtomicBool>, progress: ProgressSink) -> Self {
        Self {
            token,
            interrupt,
            progress,
        }
    }

    /// A standalone context: fresh token, cleared flag, detached sink.
    pub fn detached() -> Self {
        Self::new(
            CancellationToken::new(),
            Arc::new(AtomicBool::new(false)),
            ProgressSink::detached(),
        )
    }

    /// Cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True if the cancel request asked to interrupt blocking work.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Acquire)
    }

    /// Progress relay.
    pub fn progress(&self) -> &ProgressSink {
        &self.progress
    }

    /// Returns an error if the task should stop now.
    ///
    /// [`TaskError::Interrupted`] wins over [`TaskError::Canceled`].
    pub fn checkpoint(&self) -> Result<(), TaskError> {
        if self.is_interrupted() {
            Err(TaskError::Interrupted)
        } else if self.is_cancelled() {
            Err(TaskError::Canceled)
        } else {
            Ok(())
        }
    }
}
