//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(TaskContext) -> Result<T, TaskError>` so
//! small bodies need no dedicated type. The closure runs on a blocking worker
//! thread; shared state must be captured explicitly (`Arc<...>`).
//!
//! ## Example
//! ```rust
//! use lifeline::{Task, TaskContext, TaskError, TaskFn};
//!
//! let t = TaskFn::arc("answer", |ctx: TaskContext| {
//!     ctx.checkpoint()?;
//!     Ok::<_, TaskError>(42)
//! });
//!
//! assert_eq!(t.name(), "answer");
//! assert_eq!(t.run(TaskContext::detached()).unwrap(), 42);
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::{Task, TaskContext};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when the task is handed to a decorator.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, T> Task for TaskFn<F>
where
    F: Fn(TaskContext) -> Result<T, TaskError> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: TaskContext) -> Result<T, TaskError> {
        (self.f)(ctx)
    }
}
