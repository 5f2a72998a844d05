//! # lifeline
//!
//! **Lifeline** is the coordination layer between a task runtime and the
//! host it runs on.
//!
//! It provides two building blocks:
//! - [`ResourceSupervisor`]: keeps a companion process and exclusive resources
//!   (wake, network) alive exactly while a task queue has work.
//! - [`ProgressTask`]: wraps one blocking task, relays its progress,
//!   cancellation and completion to a presentation surface, and releases that
//!   surface exactly once however the run ends.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   TaskQueue (external, owner thread)
//!     │ QueueEvent { kind, ready, run }
//!     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ResourceSupervisor (owner thread, !Send)                         │
//! │  - occupancy_edge(): Rise on 0→1, Fall on 1→0                     │
//! │  - balance counter: start()/stop()                                │
//! │  - CompanionHost (start/stop companion on edges)                  │
//! │  - ExclusiveResource providers (fresh handle per cycle)           │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publishes LifeStarted, ResourceAcquired, ...
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └───────────────────────────────▲───────────────┬───────────────────┘
//!                                 │               ▼
//!        publishes TaskStarted,   │        SubscriberSet::listen
//!        TaskProgress, ...        │        ┌──────┼──────┐
//!                                 │        ▼      ▼      ▼
//! ┌───────────────────────────────┴───┐  sub1   sub2   subN
//! │  ProgressTask (presentation thr.) │
//! │  - PresentationSurface via slot   │◄── ProgressTaskHandle (Send): cancel, force_dismiss
//! │  - ProgressScale (0..=10000)      │
//! └──────┬────────────────────────────┘
//!        │ spawn_blocking
//!        ▼
//!   Task::run(TaskContext)  (worker thread: token, interrupt flag, progress sink)
//! ```
//!
//! ### Supervisor edges
//! ```text
//! start(): 0 → 1  ──► start companion ──► acquire each kind in mask
//! stop():  1 → 0  ──► release handles (reverse order) ──► stop companion
//! stop():  0      ──► panic
//! ```
//!
//! ### Decorator lifecycle
//! ```text
//! Created ──► Started ──► Running ──► Completed | Failed     (on_early_post_run)
//!    └───────────┴───────────┴──► CancelRequested ──► Cancelled  (on_early_cancelled)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                 |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------------|
//! | **Supervision**   | Occupancy-driven companion and exclusive resources.           | [`ResourceSupervisor`], [`Attachment`]             |
//! | **Host services** | Contracts the host implements.                                | [`CompanionHost`], [`ExclusiveResource`]           |
//! | **Queues**        | Listener contract of the task engine; reference queue.        | [`TaskQueue`], [`LocalQueue`]                      |
//! | **Progress**      | Decorator, surface contract, scaling.                         | [`ProgressTask`], [`PresentationSurface`]          |
//! | **Tasks**         | Blocking cancelable units.                                    | [`Task`], [`TaskFn`], [`TaskContext`]              |
//! | **Subscriber API**| Hook into lifecycle events.                                   | [`Subscribe`], [`SubscriberSet`], [`Bus`]          |
//! | **Errors**        | Typed errors for tasks, surfaces, hosts and builders.         | [`TaskError`], [`SurfaceError`], [`HostError`]     |
//! | **Configuration** | Supervisor settings.                                          | [`SupervisorConfig`], [`ProcessDescriptor`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use lifeline::{LocalQueue, ProcessDescriptor, ResourceMask, ResourceSupervisor, SupervisorConfig};
//!
//! let cfg = SupervisorConfig::new(ProcessDescriptor::named("sync"), ResourceMask::NONE);
//! let sup = ResourceSupervisor::builder(cfg).build().unwrap();
//!
//! let queue = Rc::new(LocalQueue::new());
//! let attachment = sup.attach(queue.clone());
//!
//! queue.push("upload");
//! assert!(sup.is_active());
//! queue.begin_next();
//! queue.finish("upload");
//! assert!(!sup.is_active());
//!
//! sup.detach(attachment);
//! ```
mod affinity;
mod config;
mod error;
mod events;
mod progress;
mod queue;
mod subscribers;
mod supervision;
mod tasks;

// ---- Public re-exports ----

pub use config::{DEFAULT_BUS_CAPACITY, ProcessDescriptor, SupervisorConfig};
pub use error::{BuildError, HostError, SurfaceError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use progress::{
    CancelAction, DecoratorState, Outcome, PRESENTATION_MAX, PresentationOptions,
    PresentationSurface, ProgressScale, ProgressTask, ProgressTaskBuilder, ProgressTaskHandle,
    Style, SurfaceSlot,
};
pub use queue::{ListenerId, LocalQueue, QueueEvent, QueueEventKind, QueueListener, TaskQueue};
pub use subscribers::{Subscribe, SubscriberSet};
pub use supervision::{
    Attachment, CompanionHost, Edge, ExclusiveResource, ProcessCompanion, ResourceHandle,
    ResourceKind, ResourceMask, ResourceSupervisor, ResourceSupervisorBuilder, occupancy_edge,
};
pub use tasks::{ProgressSink, ProgressUpdate, Task, TaskContext, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
