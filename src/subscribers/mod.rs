//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! ResourceSupervisor / ProgressTask ── publish(Event) ──► Bus
//!                                                          │
//!                                          SubscriberSet::listen
//!                                                          │
//!                                     ┌────────────┬───────┴──────┐
//!                                     ▼            ▼              ▼
//!                                 LogWriter     Metrics        Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use lifeline::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct EdgeCounter;
//!
//! #[async_trait]
//! impl Subscribe for EdgeCounter {
//!     async fn on_event(&self, event: &Event) {
//!         match event.kind {
//!             EventKind::LifeStarted => {
//!                 // increment active-period counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
