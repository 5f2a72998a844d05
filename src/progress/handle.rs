//! # Cross-thread control of a running progress task.
//!
//! [`ProgressTaskHandle`] is `Clone + Send`: it can be held by a surface's
//! cancel affordance, a worker, or any other thread. Requests travel over an
//! unbounded channel and are applied on the presentation thread in order.

use tokio::sync::mpsc;

/// Control request applied by the decorator's driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Cancel,
    ForceDismiss,
}

/// Cloneable, `Send` control handle for a [`ProgressTask`](crate::ProgressTask).
#[derive(Debug, Clone)]
pub struct ProgressTaskHandle {
    tx: mpsc::UnboundedSender<Control>,
}

impl ProgressTaskHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Control>) -> Self {
        Self { tx }
    }

    /// Requests cancellation.
    ///
    /// Returns `false` if the task already finished; the request is then a no-op.
    pub fn cancel(&self) -> bool {
        self.tx.send(Control::Cancel).is_ok()
    }

    /// Releases the surface without touching the inner task.
    ///
    /// Returns `false` if the task already finished.
    pub fn force_dismiss(&self) -> bool {
        self.tx.send(Control::ForceDismiss).is_ok()
    }

    /// True once the task finished and no longer accepts requests.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn handle_is_send_and_sync() {
        assert_send_sync::<ProgressTaskHandle>();
    }

    #[test]
    fn requests_queue_in_order_until_closed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let h = ProgressTaskHandle::new(tx);
        assert!(h.force_dismiss());
        assert!(h.clone().cancel());
        assert_eq!(rx.try_recv().ok(), Some(Control::ForceDismiss));
        assert_eq!(rx.try_recv().ok(), Some(Control::Cancel));

        drop(rx);
        assert!(h.is_closed());
        assert!(!h.cancel());
    }
}
