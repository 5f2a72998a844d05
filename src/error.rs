//! Error types used by the lifeline supervisor, decorator and tasks.
//!
//! This module defines the recoverable error enums:
//!
//! - [`TaskError`] errors raised by inner task executions.
//! - [`SurfaceError`] failures reported by a presentation surface.
//! - [`HostError`] failures of host services (companion process, exclusive resources).
//! - [`BuildError`] invalid supervisor configuration detected at build time.
//!
//! Each type provides helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! Contract violations (unbalanced `stop`, off-thread calls, unknown registrations)
//! are **not** represented here: they are caller bugs and panic at the call site.

use thiserror::Error;

use crate::supervision::ResourceKind;

/// # Errors produced by task execution.
///
/// These represent failures of the inner unit of work wrapped by a
/// [`ProgressTask`](crate::ProgressTask). The decorator never wraps or
/// interprets them; they travel unchanged to [`Outcome`](crate::Outcome).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Non-recoverable fatal error (should not be retried).
    #[error("fatal error (no retry): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// Task execution failed but may succeed if retried.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed its cancellation token and stopped.
    #[error("context cancelled")]
    Canceled,

    /// Task was interrupted in the middle of blocking work.
    #[error("interrupted")]
    Interrupted,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifeline::TaskError;
    ///
    /// let err = TaskError::Fail { error: "disk full".into() };
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Interrupted => "task_interrupted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Interrupted => "interrupted".to_string(),
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// Returns `true` for [`TaskError::Fail`] only.
    ///
    /// # Example
    /// ```
    /// use lifeline::TaskError;
    ///
    /// assert!(TaskError::Fail { error: "boom".into() }.is_retryable());
    /// assert!(!TaskError::Canceled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. })
    }

    /// True for errors caused by a cancellation request (`Canceled`, `Interrupted`).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled | TaskError::Interrupted)
    }
}

/// # Errors reported by a presentation surface.
///
/// [`SurfaceError::Detached`] is the expected outcome of host teardown racing
/// with task completion; the decorator swallows it on release.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface is no longer attached to its host context.
    #[error("surface is detached from its host")]
    Detached,

    /// The host refused the operation for another reason.
    #[error("surface rejected the operation: {reason}")]
    Rejected {
        /// Host-provided reason.
        reason: String,
    },
}

impl SurfaceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SurfaceError::Detached => "surface_detached",
            SurfaceError::Rejected { .. } => "surface_rejected",
        }
    }

    /// True if the surface was already detached from its host.
    pub fn is_detached(&self) -> bool {
        matches!(self, SurfaceError::Detached)
    }
}

/// # Errors produced by host services.
///
/// Raised by [`CompanionHost`](crate::CompanionHost) and
/// [`ExclusiveResource`](crate::ExclusiveResource) implementations. The
/// supervisor logs and publishes them; its balance counter is never affected.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HostError {
    /// The companion process could not be started.
    #[error("companion '{name}' failed to start: {reason}")]
    CompanionStart {
        /// Companion descriptor name.
        name: String,
        /// Host-provided reason.
        reason: String,
    },

    /// The companion process could not be stopped.
    #[error("companion '{name}' failed to stop: {reason}")]
    CompanionStop {
        /// Companion descriptor name.
        name: String,
        /// Host-provided reason.
        reason: String,
    },

    /// An exclusive resource could not be acquired.
    #[error("acquire {kind} failed: {reason}")]
    Acquire {
        /// Resource kind.
        kind: ResourceKind,
        /// Host-provided reason.
        reason: String,
    },

    /// An exclusive resource could not be released.
    #[error("release {kind} failed: {reason}")]
    Release {
        /// Resource kind.
        kind: ResourceKind,
        /// Host-provided reason.
        reason: String,
    },
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::CompanionStart { .. } => "host_companion_start",
            HostError::CompanionStop { .. } => "host_companion_stop",
            HostError::Acquire { .. } => "host_acquire",
            HostError::Release { .. } => "host_release",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Invalid supervisor configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The resource mask selects a kind with no registered provider.
    #[error("resource mask selects {kind} but no provider was registered")]
    MissingResource {
        /// Selected kind without provider.
        kind: ResourceKind,
    },

    /// The companion descriptor has an empty name.
    #[error("companion descriptor name is empty")]
    EmptyDescriptor,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::MissingResource { .. } => "build_missing_resource",
            BuildError::EmptyDescriptor => "build_empty_descriptor",
        }
    }
}
