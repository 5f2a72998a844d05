//! # Progress presentation for blocking tasks.
//!
//! - [`ProgressTask`]: decorator running one [`Task`](crate::Task) and driving a surface
//! - [`PresentationSurface`] / [`SurfaceSlot`]: surface contract and its exactly-once owner
//! - [`ProgressScale`] / [`PRESENTATION_MAX`]: raw progress → presented range
//! - [`ProgressTaskHandle`]: `Send` control handle (`cancel`, `force_dismiss`)
//! - [`DecoratorState`]: lifecycle of one run

mod builder;
mod decorator;
mod handle;
mod scale;
mod state;
mod surface;

#[cfg(test)]
pub(crate) mod testkit;

pub use builder::{PresentationOptions, ProgressTaskBuilder};
pub use decorator::{Outcome, ProgressTask};
pub use handle::ProgressTaskHandle;
pub use scale::{PRESENTATION_MAX, ProgressScale};
pub use state::DecoratorState;
pub use surface::{CancelAction, PresentationSurface, Style, SurfaceSlot};
