//! # Runtime events emitted by the resource supervisor and progress tasks.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Supervisor events**: occupancy edges, companion and resource lifecycle
//! - **Queue events**: attach/detach of a supervisor to a task queue
//! - **Task events**: progress task lifecycle (started, progress, terminal)
//! - **Surface events**: presentation surface release outcomes
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! resource kind, numeric values and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use lifeline::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskProgress)
//!     .with_task("progress(download)")
//!     .with_value(5000);
//!
//! assert_eq!(ev.kind, EventKind::TaskProgress);
//! assert_eq!(ev.task.as_deref(), Some("progress(download)"));
//! assert_eq!(ev.value, Some(5000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::supervision::ResourceKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Supervisor events ===
    /// Balance counter moved 0 → 1.
    ///
    /// Sets:
    /// - `task`: companion name
    /// - `value`: balance after the edge (always 1)
    LifeStarted,

    /// Balance counter moved 1 → 0.
    ///
    /// Sets:
    /// - `task`: companion name
    /// - `value`: balance after the edge (always 0)
    LifeStopped,

    /// Companion start was requested from the host.
    ///
    /// Sets:
    /// - `task`: companion name
    CompanionStartRequested,

    /// Companion stop was requested from the host.
    ///
    /// Sets:
    /// - `task`: companion name
    CompanionStopRequested,

    /// The host failed to start or stop the companion.
    ///
    /// Sets:
    /// - `task`: companion name
    /// - `reason`: host error
    CompanionFailed,

    /// A fresh exclusive resource handle was acquired.
    ///
    /// Sets:
    /// - `resource`: resource kind
    /// - `value`: acquisition cycle number (1-based)
    ResourceAcquired,

    /// An exclusive resource handle was released and discarded.
    ///
    /// Sets:
    /// - `resource`: resource kind
    /// - `value`: acquisition cycle number (1-based)
    ResourceReleased,

    /// The host failed to acquire or release an exclusive resource.
    ///
    /// Sets:
    /// - `resource`: resource kind
    /// - `reason`: host error
    ResourceFailed,

    // === Queue events ===
    /// Supervisor listener registered on a task queue.
    QueueAttached,

    /// Supervisor listener removed from a task queue.
    QueueDetached,

    // === Task events ===
    /// Presentation initialized; background execution is about to begin.
    ///
    /// Sets:
    /// - `task`: decorator name
    TaskStarted,

    /// Progress range initialized.
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `value`: presented maximum
    TaskProgressInit,

    /// Presented progress value changed.
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `value`: presented value
    TaskProgress,

    /// Cancellation requested.
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `reason`: `"before_start"` or `"while_running"`
    TaskCancelRequested,

    /// Inner task finished successfully.
    TaskCompleted,

    /// Run ended through the cancellation path.
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `reason`: inner error, if any
    TaskCancelled,

    /// Inner task returned an error.
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `reason`: inner error
    TaskFailed,

    // === Surface events ===
    /// Presentation surface released.
    SurfaceReleased,

    /// Presentation surface release did not complete (swallowed).
    ///
    /// Sets:
    /// - `task`: decorator name
    /// - `reason`: unset for an already-detached surface, host rejection otherwise
    SurfaceDetached,

    /// Presentation surface released administratively; the task keeps running.
    SurfaceForceDismissed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Event classification.
    pub kind: EventKind,
    /// Name of the task or companion, if applicable.
    pub task: Option<Arc<str>>,
    /// Exclusive resource kind, if applicable.
    pub resource: Option<ResourceKind>,
    /// Numeric payload (balance, progress, cycle).
    pub value: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            resource: None,
            value: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task (or companion) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a resource kind.
    #[inline]
    pub fn with_resource(mut self, kind: ResourceKind) -> Self {
        self.resource = Some(kind);
        self
    }

    /// Attaches a numeric value.
    #[inline]
    pub fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// True for task terminal events (`TaskCompleted`, `TaskCancelled`, `TaskFailed`).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskCompleted | EventKind::TaskCancelled | EventKind::TaskFailed
        )
    }

    /// True for `SubscriberOverflow`; the subscriber set never re-publishes these.
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for `SubscriberPanicked`.
    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::LifeStarted);
        let b = Event::new(EventKind::LifeStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn terminal_classification() {
        assert!(Event::new(EventKind::TaskCancelled).is_terminal());
        assert!(Event::new(EventKind::TaskFailed).is_terminal());
        assert!(!Event::new(EventKind::SurfaceReleased).is_terminal());
    }

    #[test]
    fn builders_fill_fields() {
        let ev = Event::new(EventKind::ResourceAcquired)
            .with_resource(ResourceKind::Wake)
            .with_value(3)
            .with_reason("ok");
        assert_eq!(ev.resource, Some(ResourceKind::Wake));
        assert_eq!(ev.value, Some(3));
        assert_eq!(ev.reason.as_deref(), Some("ok"));
    }
}
