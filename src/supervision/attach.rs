//! # Driving a supervisor from task queue occupancy.
//!
//! [`ResourceSupervisor::attach`] registers a listener on a [`TaskQueue`]. The
//! listener maps each [`QueueEvent`] to an occupancy [`Edge`] using only the
//! post-transition snapshot the event carries:
//!
//! ```text
//! AddedToReady      ready + run == 1  ──► Edge::Rise  ──► start()
//! RemovedFromReady  ready + run == 0  ──► Edge::Fall  ──► stop()
//! RemovedFromRun    ready + run == 0  ──► Edge::Fall  ──► stop()
//! MovedToRun                          ──► (none)
//! ```
//!
//! The returned [`Attachment`] is the only way to unregister.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::events::EventKind;
use crate::queue::{ListenerId, QueueEvent, QueueEventKind, TaskQueue};

use super::supervisor::ResourceSupervisor;

/// Occupancy edge derived from one queue transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Aggregate occupancy moved 0 → 1.
    Rise,
    /// Aggregate occupancy moved 1 → 0.
    Fall,
}

/// Maps a queue transition to the occupancy edge it represents, if any.
///
/// # Example
/// ```
/// use lifeline::{occupancy_edge, Edge, QueueEvent, QueueEventKind};
///
/// let ev = QueueEvent::new(QueueEventKind::AddedToReady, 1, 0);
/// assert_eq!(occupancy_edge(&ev), Some(Edge::Rise));
///
/// let ev = QueueEvent::new(QueueEventKind::MovedToRun, 0, 1);
/// assert_eq!(occupancy_edge(&ev), None);
/// ```
pub fn occupancy_edge(ev: &QueueEvent) -> Option<Edge> {
    match (ev.kind, ev.occupancy()) {
        (QueueEventKind::AddedToReady, 1) => Some(Edge::Rise),
        (QueueEventKind::RemovedFromReady | QueueEventKind::RemovedFromRun, 0) => Some(Edge::Fall),
        _ => None,
    }
}

/// Registration token returned by [`ResourceSupervisor::attach`].
///
/// Pass it back to [`ResourceSupervisor::detach`] to unregister. Dropping it
/// leaves the listener registered for the lifetime of the queue.
#[must_use = "an Attachment is the only way to detach the supervisor"]
pub struct Attachment {
    queue: Rc<dyn TaskQueue>,
    id: ListenerId,
    owner: Weak<ResourceSupervisor>,
    engaged: Rc<Cell<bool>>,
}

impl Attachment {
    /// Listener id assigned by the queue.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// True while this attachment holds one unit of the supervisor's balance.
    pub fn is_engaged(&self) -> bool {
        self.engaged.get()
    }
}

impl ResourceSupervisor {
    /// Drives this supervisor from `queue` occupancy.
    ///
    /// Each attachment contributes at most one unit to the balance: a rise
    /// engages it, a fall disengages it. A fall seen before any rise (the
    /// queue was busy at attach time) is ignored.
    ///
    /// # Panics
    /// If called off the owner thread.
    pub fn attach(self: &Rc<Self>, queue: Rc<dyn TaskQueue>) -> Attachment {
        self.assert_owner("ResourceSupervisor::attach");
        let me = Rc::downgrade(self);
        let engaged = Rc::new(Cell::new(false));

        let listener_me = Weak::clone(&me);
        let listener_engaged = Rc::clone(&engaged);
        let id = queue.add_listener(Rc::new(move |ev: &QueueEvent| {
            let Some(edge) = occupancy_edge(ev) else {
                return;
            };
            let Some(sup) = listener_me.upgrade() else {
                return;
            };
            match (edge, listener_engaged.get()) {
                (Edge::Rise, false) => {
                    listener_engaged.set(true);
                    sup.start();
                }
                (Edge::Fall, true) => {
                    listener_engaged.set(false);
                    sup.stop();
                }
                (Edge::Fall, false) => {
                    warn!(
                        kind = ev.kind.as_label(),
                        ready = ev.ready,
                        run = ev.run,
                        "occupancy fell without a matching rise"
                    );
                }
                (Edge::Rise, true) => {
                    debug!(kind = ev.kind.as_label(), "rise while engaged ignored");
                }
            }
        }));

        self.publish(EventKind::QueueAttached);
        Attachment {
            queue,
            id,
            owner: me,
            engaged,
        }
    }

    /// Unregisters the listener installed by [`attach`](Self::attach).
    ///
    /// If the attachment is still engaged, its unit of balance is returned
    /// with a `stop()`. When that unit is the last one, the held resources are
    /// released and the companion stopped even though the queue may still
    /// have ready or running tasks. Detach after the queue drains, or hold an
    /// explicit [`start`](Self::start) across the detach, to keep them alive.
    ///
    /// # Panics
    /// - off the supervisor's owner thread or the queue's owner thread
    /// - if the attachment belongs to another supervisor
    /// - if the queue does not know the registration
    pub fn detach(self: &Rc<Self>, attachment: Attachment) {
        self.assert_owner("ResourceSupervisor::detach");
        assert!(
            attachment.queue.is_owner_thread(),
            "ResourceSupervisor::detach must run on the queue owner thread"
        );
        assert!(
            Weak::ptr_eq(&attachment.owner, &Rc::downgrade(self)),
            "attachment belongs to another supervisor"
        );
        assert!(
            attachment.queue.remove_listener(attachment.id),
            "queue does not know listener {:?}",
            attachment.id
        );

        if attachment.engaged.replace(false) {
            self.stop();
        }
        self.publish(EventKind::QueueDetached);
    }
}
