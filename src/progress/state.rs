//! # Decorator lifecycle.
//!
//! ```text
//! Created ──► Started ──► Running ──► Completed | Failed
//!    │           │           │
//!    └───────────┴───────────┴──► CancelRequested ──► Cancelled
//! ```

/// Lifecycle state of a [`ProgressTask`](crate::ProgressTask).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorState {
    /// Built, not yet run.
    Created,
    /// Surface initialized and shown.
    Started,
    /// Inner task submitted to the blocking pool.
    Running,
    /// Cancellation requested; waiting for the inner task (if any) to return.
    CancelRequested,
    /// Inner task returned successfully.
    Completed,
    /// Terminated after a cancel request.
    Cancelled,
    /// Inner task returned an error.
    Failed,
}

impl DecoratorState {
    /// True for `Completed`, `Cancelled` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DecoratorState::Completed | DecoratorState::Cancelled | DecoratorState::Failed
        )
    }

    /// True if a cancel request is accepted in this state.
    pub fn accepts_cancel(self) -> bool {
        matches!(
            self,
            DecoratorState::Created | DecoratorState::Started | DecoratorState::Running
        )
    }

    /// Returns a short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            DecoratorState::Created => "created",
            DecoratorState::Started => "started",
            DecoratorState::Running => "running",
            DecoratorState::CancelRequested => "cancel_requested",
            DecoratorState::Completed => "completed",
            DecoratorState::Cancelled => "cancelled",
            DecoratorState::Failed => "failed",
        }
    }

    fn allows(self, next: DecoratorState) -> bool {
        use DecoratorState::*;
        matches!(
            (self, next),
            (Created, Started)
                | (Started, Running)
                | (Running, Completed | Failed)
                | (Created | Started | Running, CancelRequested)
                | (CancelRequested, Cancelled)
        )
    }

    /// Moves to `next`.
    ///
    /// # Panics
    /// On an illegal transition.
    #[track_caller]
    pub(crate) fn advance(&mut self, next: DecoratorState) {
        assert!(
            self.allows(next),
            "illegal decorator transition {} -> {}",
            self.as_label(),
            next.as_label()
        );
        *self = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let mut s = DecoratorState::Created;
        s.advance(DecoratorState::Started);
        s.advance(DecoratorState::Running);
        s.advance(DecoratorState::Completed);
        assert!(s.is_terminal());
        assert!(!s.accepts_cancel());
    }

    #[test]
    fn cancel_before_start() {
        let mut s = DecoratorState::Created;
        assert!(s.accepts_cancel());
        s.advance(DecoratorState::CancelRequested);
        s.advance(DecoratorState::Cancelled);
        assert!(s.is_terminal());
    }

    #[test]
    #[should_panic(expected = "illegal decorator transition completed -> cancel_requested")]
    fn cancel_after_completion_is_illegal() {
        let mut s = DecoratorState::Completed;
        s.advance(DecoratorState::CancelRequested);
    }

    #[test]
    #[should_panic(expected = "illegal decorator transition")]
    fn cancel_requested_cannot_complete() {
        let mut s = DecoratorState::CancelRequested;
        s.advance(DecoratorState::Completed);
    }
}
