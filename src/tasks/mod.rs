//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for blocking cancelable units of work
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskContext`] / [`ProgressSink`] - what a running task observes and reports through

mod context;
mod task;
mod task_fn;

pub use context::{ProgressSink, ProgressUpdate, TaskContext};
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
