//! # Companion process hosting.
//!
//! The supervisor asks a [`CompanionHost`] to start its companion on every
//! 0→1 edge and to stop it on every 1→0 edge. [`ProcessCompanion`] is the
//! default host: it launches `descriptor.program` as a child process, or only
//! logs the request when the descriptor names no program.

use std::cell::RefCell;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::config::ProcessDescriptor;
use crate::error::HostError;

/// Host service that runs the long-lived companion.
pub trait CompanionHost {
    /// Starts the companion described by `descriptor`.
    fn start_companion(&self, descriptor: &ProcessDescriptor) -> Result<(), HostError>;

    /// Stops the companion described by `descriptor`.
    fn stop_companion(&self, descriptor: &ProcessDescriptor) -> Result<(), HostError>;
}

/// Companion host backed by an OS child process.
///
/// A descriptor without `program` is a logical companion: start/stop succeed
/// without spawning anything.
#[derive(Debug, Default)]
pub struct ProcessCompanion {
    child: RefCell<Option<Child>>,
}

impl ProcessCompanion {
    /// Creates a host with no running child.
    pub fn new() -> Self {
        Self::default()
    }

    /// OS pid of the running child, if any.
    pub fn pid(&self) -> Option<u32> {
        self.child.borrow().as_ref().map(Child::id)
    }
}

impl CompanionHost for ProcessCompanion {
    fn start_companion(&self, descriptor: &ProcessDescriptor) -> Result<(), HostError> {
        let Some(program) = descriptor.program.as_ref() else {
            debug!(companion = descriptor.name(), "logical companion started");
            return Ok(());
        };
        if self.child.borrow().is_some() {
            return Err(HostError::CompanionStart {
                name: descriptor.name().to_string(),
                reason: "already running".into(),
            });
        }

        let child = Command::new(program)
            .args(&descriptor.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| HostError::CompanionStart {
                name: descriptor.name().to_string(),
                reason: e.to_string(),
            })?;
        debug!(companion = descriptor.name(), pid = child.id(), "companion spawned");
        *self.child.borrow_mut() = Some(child);
        Ok(())
    }

    fn stop_companion(&self, descriptor: &ProcessDescriptor) -> Result<(), HostError> {
        let Some(mut child) = self.child.borrow_mut().take() else {
            debug!(companion = descriptor.name(), "logical companion stopped");
            return Ok(());
        };
        let stop_err = |e: std::io::Error| HostError::CompanionStop {
            name: descriptor.name().to_string(),
            reason: e.to_string(),
        };
        child.kill().map_err(stop_err)?;
        let status = child.wait().map_err(stop_err)?;
        debug!(companion = descriptor.name(), %status, "companion reaped");
        Ok(())
    }
}
