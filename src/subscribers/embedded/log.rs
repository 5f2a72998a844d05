//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [life-started] companion="sync"
//! [resource-acquired] kind=wake cycle=1
//! [task-started] task="progress(download)"
//! [task-progress] task="progress(download)" value=5000
//! [task-completed] task="progress(download)"
//! [surface-released] task="progress(download)"
//! [resource-released] kind=wake cycle=1
//! [life-stopped] companion="sync"
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::LifeStarted => println!("[life-started] companion={task:?}"),
            EventKind::LifeStopped => println!("[life-stopped] companion={task:?}"),
            EventKind::CompanionStartRequested => {
                println!("[companion-start] companion={task:?}")
            }
            EventKind::CompanionStopRequested => {
                println!("[companion-stop] companion={task:?}")
            }
            EventKind::CompanionFailed => {
                println!("[companion-failed] companion={task:?} err={reason:?}")
            }
            EventKind::ResourceAcquired | EventKind::ResourceReleased => {
                let tag = if e.kind == EventKind::ResourceAcquired {
                    "resource-acquired"
                } else {
                    "resource-released"
                };
                match (e.resource, e.value) {
                    (Some(kind), Some(cycle)) => println!("[{tag}] kind={kind} cycle={cycle}"),
                    (Some(kind), None) => println!("[{tag}] kind={kind}"),
                    _ => println!("[{tag}]"),
                }
            }
            EventKind::ResourceFailed => match e.resource {
                Some(kind) => println!("[resource-failed] kind={kind} err={reason:?}"),
                None => println!("[resource-failed] err={reason:?}"),
            },
            EventKind::QueueAttached => println!("[queue-attached] companion={task:?}"),
            EventKind::QueueDetached => println!("[queue-detached] companion={task:?}"),
            EventKind::TaskStarted => println!("[task-started] task={task:?}"),
            EventKind::TaskProgressInit => {
                println!("[task-progress-init] task={task:?} max={:?}", e.value)
            }
            EventKind::TaskProgress => {
                println!("[task-progress] task={task:?} value={:?}", e.value)
            }
            EventKind::TaskCancelRequested => {
                println!("[task-cancel-requested] task={task:?} when={reason}")
            }
            EventKind::TaskCompleted => println!("[task-completed] task={task:?}"),
            EventKind::TaskCancelled => {
                println!("[task-cancelled] task={task:?} err={reason:?}")
            }
            EventKind::TaskFailed => println!("[task-failed] task={task:?} err={reason:?}"),
            EventKind::SurfaceReleased => println!("[surface-released] task={task:?}"),
            EventKind::SurfaceDetached => println!("[surface-detached] task={task:?}"),
            EventKind::SurfaceForceDismissed => {
                println!("[surface-force-dismissed] task={task:?}")
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={task:?} reason={reason:?}")
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] subscriber={task} info={reason}")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
