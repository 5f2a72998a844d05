//! # Task queue contract.
//!
//! The task execution engine is an external collaborator. This module defines
//! the slice of it the [`ResourceSupervisor`](crate::ResourceSupervisor) needs:
//! listener registration keyed by an opaque [`ListenerId`], an owner-thread
//! check, and the four [`QueueEventKind`] transitions.
//!
//! [`LocalQueue`] is a single-threaded reference implementation that tracks
//! ready/run sets by task name.
//!
//! ## Wiring
//! ```text
//! engine transitions ──► TaskQueue ──► QueueListener(&QueueEvent)  (owner thread)
//!                                             │
//!                                             └──► ResourceSupervisor::start/stop
//! ```

mod event;
mod local;

use std::rc::Rc;

pub use event::{QueueEvent, QueueEventKind};
pub use local::LocalQueue;

/// Callback invoked on the queue owner thread for each transition.
pub type QueueListener = Rc<dyn Fn(&QueueEvent)>;

/// Opaque registration key returned by [`TaskQueue::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wraps a queue-assigned raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Listener registration surface of a task queue.
///
/// Implementations deliver every transition to every registered listener on
/// the queue's owner thread, in transition order.
pub trait TaskQueue {
    /// Registers a listener; the returned id removes it later.
    fn add_listener(&self, listener: QueueListener) -> ListenerId;

    /// Removes a listener. Returns `false` if the id is unknown.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// True if the calling thread is the queue's owner thread.
    fn is_owner_thread(&self) -> bool;
}
