//! # Task queue transition notifications.
//!
//! A [`QueueEvent`] is delivered on the queue's owner thread after every
//! transition and carries the **post-transition** sizes of the ready and run
//! sets. Consumers decide on occupancy edges from this snapshot alone.

use std::sync::Arc;

/// Kind of queue transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueEventKind {
    /// A task entered the ready set.
    AddedToReady,
    /// A task left the ready set without running (cancelled/dropped).
    RemovedFromReady,
    /// A task moved from the ready set to the run set.
    MovedToRun,
    /// A task left the run set (finished, failed or cancelled).
    RemovedFromRun,
}

impl QueueEventKind {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueEventKind::AddedToReady => "added_to_ready",
            QueueEventKind::RemovedFromReady => "removed_from_ready",
            QueueEventKind::MovedToRun => "moved_to_run",
            QueueEventKind::RemovedFromRun => "removed_from_run",
        }
    }
}

/// One queue transition with its post-transition snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEvent {
    /// Transition kind.
    pub kind: QueueEventKind,
    /// Ready-set size after the transition.
    pub ready: usize,
    /// Run-set size after the transition.
    pub run: usize,
    /// Task that caused the transition, if known.
    pub task: Option<Arc<str>>,
}

impl QueueEvent {
    /// Creates an event with the given post-transition sizes.
    pub fn new(kind: QueueEventKind, ready: usize, run: usize) -> Self {
        Self {
            kind,
            ready,
            run,
            task: None,
        }
    }

    /// Attaches the task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Aggregate occupancy (`ready + run`) after the transition.
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.ready + self.run
    }
}
