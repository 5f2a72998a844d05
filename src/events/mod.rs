//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the resource supervisor,
//! progress tasks and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ResourceSupervisor` (edges, companion, resources, attach),
//!   `ProgressTask` (lifecycle, progress, surface), `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: `SubscriberSet::listen` and any receiver from `Bus::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
