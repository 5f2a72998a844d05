//! # Resource supervision.
//!
//! A [`ResourceSupervisor`] ties a companion process and a set of exclusive
//! resources to the aggregate activity of a task queue:
//!
//! - [`resource`](ExclusiveResource): resource kinds, masks, providers and consumable handles
//! - [`CompanionHost`]: starts/stops the companion; [`ProcessCompanion`] is the OS-process host
//! - [`ResourceSupervisor`]: owner-thread start/stop counter acting on 0/1 edges
//! - [`Attachment`]: queue registration that drives the counter from [`occupancy_edge`]

mod attach;
mod companion;
mod resource;
mod supervisor;

#[cfg(test)]
pub(crate) mod testkit;

pub use attach::{Attachment, Edge, occupancy_edge};
pub use companion::{CompanionHost, ProcessCompanion};
pub use resource::{ExclusiveResource, ResourceHandle, ResourceKind, ResourceMask};
pub use supervisor::{ResourceSupervisor, ResourceSupervisorBuilder};
