//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`] centralized settings for a
//! [`ResourceSupervisor`](crate::ResourceSupervisor) and the
//! [`ProcessDescriptor`] naming its companion process.
//!
//! Config is used in one place:
//! **Supervisor creation**: `ResourceSupervisor::builder(config)`
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus
//! - `resources = ResourceMask::NONE` → only the companion is driven

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::supervision::ResourceMask;

/// Default capacity of the event bus ring buffer.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Describes the companion process a supervisor keeps alive while work is active.
///
/// `name` identifies the companion in logs and events. `program`/`args` are
/// only consulted by hosts that launch an OS process (see
/// [`ProcessCompanion`](crate::ProcessCompanion)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessDescriptor {
    /// Stable companion name.
    pub name: Cow<'static, str>,
    /// Executable to launch, if the host spawns a process.
    pub program: Option<PathBuf>,
    /// Arguments passed to `program`.
    pub args: Vec<OsString>,
}

impl ProcessDescriptor {
    /// Creates a descriptor with only a name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            program: None,
            args: Vec::new(),
        }
    }

    /// Sets the executable launched by process-backed hosts.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Appends one argument.
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns the companion name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Configuration for a resource supervisor.
///
/// ## Field semantics
/// - `companion`: companion process started on 0→1, stopped on 1→0
/// - `resources`: bit-set of exclusive resource kinds to hold while active
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Companion process descriptor.
    pub companion: ProcessDescriptor,

    /// Exclusive resource kinds acquired on every 0→1 edge.
    pub resources: ResourceMask,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Creates a config for the given companion and resource mask.
    pub fn new(companion: ProcessDescriptor, resources: ResourceMask) -> Self {
        Self {
            companion,
            resources,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `companion = "lifeline-companion"` (name only, no program)
    /// - `resources = ResourceMask::WAKE`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self::new(
            ProcessDescriptor::named("lifeline-companion"),
            ResourceMask::WAKE,
        )
    }
}
