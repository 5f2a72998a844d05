//! # LocalQueue: single-threaded reference task queue.
//!
//! Tracks task names in a FIFO ready set and a run set and notifies listeners
//! after each transition with the post-transition sizes.
//!
//! ## Transitions
//! ```text
//! push(name)      ──► ready += name          ──► AddedToReady
//! withdraw(name)  ──► ready -= name          ──► RemovedFromReady
//! begin_next()    ──► ready.front → run      ──► MovedToRun
//! finish(name)    ──► run -= name            ──► RemovedFromRun
//! ```
//!
//! ## Rules
//! - Task names are unique across ready ∪ run; duplicates are rejected
//! - Listeners run after the sets are updated and may call back into the queue
//! - All methods must be called on the thread that created the queue

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::affinity::Affinity;

use super::{ListenerId, QueueEvent, QueueEventKind, QueueListener, TaskQueue};

/// Reference [`TaskQueue`] with ready/run sets keyed by task name.
pub struct LocalQueue {
    affinity: Affinity,
    ready: RefCell<VecDeque<Arc<str>>>,
    run: RefCell<Vec<Arc<str>>>,
    listeners: RefCell<Vec<(ListenerId, QueueListener)>>,
    next_id: Cell<u64>,
}

impl LocalQueue {
    /// Creates an empty queue owned by the calling thread.
    pub fn new() -> Self {
        Self {
            affinity: Affinity::current(),
            ready: RefCell::new(VecDeque::new()),
            run: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Adds a task to the ready set. Returns `false` if the name is already queued or running.
    pub fn push(&self, name: impl Into<Arc<str>>) -> bool {
        self.affinity.assert_owner("LocalQueue::push");
        let name: Arc<str> = name.into();
        if self.contains(&name) {
            return false;
        }
        self.ready.borrow_mut().push_back(Arc::clone(&name));
        self.notify(QueueEventKind::AddedToReady, name);
        true
    }

    /// Removes a task from the ready set before it runs.
    pub fn withdraw(&self, name: &str) -> bool {
        self.affinity.assert_owner("LocalQueue::withdraw");
        let removed = {
            let mut ready = self.ready.borrow_mut();
            let idx = ready.iter().position(|n| n.as_ref() == name);
            idx.and_then(|idx| ready.remove(idx))
        };
        match removed {
            Some(name) => {
                self.notify(QueueEventKind::RemovedFromReady, name);
                true
            }
            None => false,
        }
    }

    /// Moves the oldest ready task to the run set and returns its name.
    pub fn begin_next(&self) -> Option<Arc<str>> {
        self.affinity.assert_owner("LocalQueue::begin_next");
        let name = self.ready.borrow_mut().pop_front()?;
        self.run.borrow_mut().push(Arc::clone(&name));
        self.notify(QueueEventKind::MovedToRun, Arc::clone(&name));
        Some(name)
    }

    /// Removes a task from the run set.
    pub fn finish(&self, name: &str) -> bool {
        self.affinity.assert_owner("LocalQueue::finish");
        let removed = {
            let mut run = self.run.borrow_mut();
            let idx = run.iter().position(|n| n.as_ref() == name);
            idx.map(|idx| run.swap_remove(idx))
        };
        match removed {
            Some(name) => {
                self.notify(QueueEventKind::RemovedFromRun, name);
                true
            }
            None => false,
        }
    }

    /// Number of ready tasks.
    pub fn ready_len(&self) -> usize {
        self.ready.borrow().len()
    }

    /// Number of running tasks.
    pub fn run_len(&self) -> usize {
        self.run.borrow().len()
    }

    /// True if no task is ready or running.
    pub fn is_idle(&self) -> bool {
        self.ready_len() + self.run_len() == 0
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn contains(&self, name: &str) -> bool {
        self.ready.borrow().iter().any(|n| n.as_ref() == name)
            || self.run.borrow().iter().any(|n| n.as_ref() == name)
    }

    /// Snapshot sizes, release borrows, then call listeners in registration order.
    fn notify(&self, kind: QueueEventKind, task: Arc<str>) {
        let ev = QueueEvent::new(kind, self.ready_len(), self.run_len()).with_task(task);
        trace!(kind = kind.as_label(), ready = ev.ready, run = ev.run, "queue transition");

        let listeners: Vec<QueueListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&ev);
        }
    }
}

impl Default for LocalQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for LocalQueue {
    fn add_listener(&self, listener: QueueListener) -> ListenerId {
        self.affinity.assert_owner("LocalQueue::add_listener");
        let id = ListenerId::from_raw(self.next_id.get());
        self.next_id.set(id.as_raw() + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.affinity.assert_owner("LocalQueue::remove_listener");
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(lid, _)| *lid == id) {
            Some(idx) => {
                listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    fn is_owner_thread(&self) -> bool {
        self.affinity.is_owner()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn recorder(q: &LocalQueue) -> (ListenerId, Rc<RefCell<Vec<QueueEvent>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = q.add_listener(Rc::new(move |ev: &QueueEvent| {
            sink.borrow_mut().push(ev.clone());
        }));
        (id, seen)
    }

    #[test]
    fn transitions_carry_post_transition_sizes() {
        let q = LocalQueue::new();
        let (_, seen) = recorder(&q);

        assert!(q.push("a"));
        assert!(q.push("b"));
        assert_eq!(q.begin_next().as_deref(), Some("a"));
        assert!(q.withdraw("b"));
        assert!(q.finish("a"));

        let got: Vec<(QueueEventKind, usize, usize)> = seen
            .borrow()
            .iter()
            .map(|e| (e.kind, e.ready, e.run))
            .collect();
        assert_eq!(
            got,
            vec![
                (QueueEventKind::AddedToReady, 1, 0),
                (QueueEventKind::AddedToReady, 2, 0),
                (QueueEventKind::MovedToRun, 1, 1),
                (QueueEventKind::RemovedFromReady, 0, 1),
                (QueueEventKind::RemovedFromRun, 0, 0),
            ]
        );
        assert!(q.is_idle());
    }

    #[test]
    fn duplicate_and_unknown_names_are_rejected() {
        let q = LocalQueue::new();
        assert!(q.push("a"));
        assert!(!q.push("a"));
        assert!(!q.withdraw("zzz"));
        assert!(!q.finish("a"));
        assert_eq!(q.begin_next().as_deref(), Some("a"));
        assert!(!q.push("a"));
        assert!(q.begin_next().is_none());
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let q = LocalQueue::new();
        let (id, seen) = recorder(&q);
        q.push("a");
        assert!(q.remove_listener(id));
        assert!(!q.remove_listener(id));
        q.push("b");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(q.listener_count(), 0);
    }

    #[test]
    fn listener_may_reenter_queue() {
        let q = Rc::new(LocalQueue::new());
        let weak = Rc::downgrade(&q);
        q.add_listener(Rc::new(move |ev: &QueueEvent| {
            if ev.kind == QueueEventKind::AddedToReady {
                if let Some(q) = weak.upgrade() {
                    q.begin_next();
                }
            }
        }));
        q.push("a");
        assert_eq!(q.ready_len(), 0);
        assert_eq!(q.run_len(), 1);
    }
}
