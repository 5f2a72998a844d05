//! # Blocking, cancelable unit of work.
//!
//! This module defines the [`Task`] trait. A task's [`run`](Task::run) is
//! invoked on a blocking worker thread and receives a [`TaskContext`]; it
//! should check the context periodically and stop once cancellation is
//! requested. The common handle type is [`TaskRef`], an `Arc<dyn Task>`.

use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::TaskContext;

/// # Blocking, cancelable unit.
///
/// A `Task` has a stable [`name`](Task::name), a blocking [`run`](Task::run)
/// entry point and an optional [`cancel`](Task::cancel) hook.
///
/// # Example
/// ```
/// use lifeline::{Task, TaskContext, TaskError};
///
/// struct Checksum(Vec<u8>);
///
/// impl Task for Checksum {
///     type Output = u32;
///
///     fn name(&self) -> &str { "checksum" }
///
///     fn run(&self, ctx: TaskContext) -> Result<u32, TaskError> {
///         ctx.progress().init(self.0.len() as u64);
///         let mut sum = 0u32;
///         for (i, b) in self.0.iter().enumerate() {
///             ctx.checkpoint()?;
///             sum = sum.wrapping_add(*b as u32);
///             ctx.progress().report(i as u64 + 1);
///         }
///         Ok(sum)
///     }
/// }
///
/// let sum = Checksum(vec![1, 2, 3]).run(TaskContext::detached()).unwrap();
/// assert_eq!(sum, 6);
/// ```
pub trait Task: Send + Sync + 'static {
    /// Value produced on success.
    type Output: Send + 'static;

    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task on the calling (worker) thread until completion or cancellation.
    fn run(&self, ctx: TaskContext) -> Result<Self::Output, TaskError>;

    /// Called on the presentation thread when cancellation is requested.
    ///
    /// The context token is already cancelled when this runs; override it to
    /// unblock I/O the body may be parked in.
    fn cancel(&self, interrupt: bool) {
        let _ = interrupt;
    }
}

/// Shared handle to a task.
pub type TaskRef<T> = Arc<dyn Task<Output = T>>;
