//! # ProgressTask: cancelable decorator bridging a blocking task to a presentation surface.
//!
//! The decorator runs on the presentation thread (the thread that polls
//! [`ProgressTask::run`]) and submits the inner task to tokio's blocking pool.
//! Everything the worker produces comes back over channels:
//!
//! ```text
//! presentation thread                                     blocking worker
//! ───────────────────                                     ───────────────
//! run()
//!  ├─ drain pending controls (cancel before start?) ──► on_early_cancelled(None)
//!  ├─ on_started(): title, message, style, range, cancel action, show
//!  ├─ spawn_blocking ───────────────────────────────────► run_background(inner, ctx)
//!  │                                                       ├─ ctx.progress().init/report ─┐
//!  │  loop select! (biased)                                │                              │
//!  │   ├─ control rx   (Cancel | ForceDismiss)  ◄──────────┼── ProgressTaskHandle         │
//!  │   ├─ progress rx  → on_progress_init / on_progress ◄──┼──────────────────────────────┘
//!  │   └─ result  (oneshot, single assignment) ◄───────────┘
//!  ├─ drain leftover progress
//!  └─ exactly one of:
//!       on_early_cancelled(err)   cancel was requested
//!       on_early_post_run(result) otherwise
//!       (both release the surface through the SurfaceSlot)
//! ```
//!
//! ## Rules
//! - The surface is dismissed at most once; an already-detached surface is not an error
//! - `force_dismiss` releases only the surface; the inner task keeps running
//! - Cancel after the terminal hook is a no-op
//! - Cancel after the worker has returned, but before its result is observed, is a no-op
//! - A panicking inner task surfaces as [`TaskError::Fatal`]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::affinity::Affinity;
use crate::error::{SurfaceError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{ProgressSink, ProgressUpdate, Task, TaskContext};

use super::builder::{PresentationOptions, ProgressTaskBuilder};
use super::handle::{Control, ProgressTaskHandle};
use super::scale::ProgressScale;
use super::state::DecoratorState;
use super::surface::{CancelAction, PresentationSurface, SurfaceSlot};

/// How a progress task ended.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Inner task returned a value and no cancel was requested.
    Completed(T),
    /// Inner task returned an error and no cancel was requested.
    Failed(TaskError),
    /// A cancel was requested. Carries the inner error, if the task returned one.
    Cancelled(Option<TaskError>),
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// True for [`Outcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled(_))
    }

    /// True for [`Outcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Converts into a `Result`; a bare cancellation maps to [`TaskError::Canceled`].
    pub fn into_result(self) -> Result<T, TaskError> {
        match self {
            Outcome::Completed(v) => Ok(v),
            Outcome::Failed(e) | Outcome::Cancelled(Some(e)) => Err(e),
            Outcome::Cancelled(None) => Err(TaskError::Canceled),
        }
    }
}

type WorkerResult<O> = Result<O, TaskError>;

enum Step<O> {
    Control(Control),
    Progress(ProgressUpdate),
    Finished(Result<WorkerResult<O>, oneshot::error::RecvError>),
}

/// Decorator that runs one blocking [`Task`] while driving a [`PresentationSurface`].
///
/// `!Send`: it is built, controlled and run on the presentation thread. Use
/// [`handle`](ProgressTask::handle) to control it from elsewhere.
pub struct ProgressTask<T: Task + ?Sized, S: PresentationSurface> {
    affinity: Affinity,
    name: Arc<str>,
    inner: Arc<T>,
    slot: SurfaceSlot<S>,
    opts: PresentationOptions,
    on_dismiss: Option<Box<dyn FnOnce()>>,
    bus: Option<Bus>,
    state: DecoratorState,
    scale: ProgressScale,
    token: CancellationToken,
    interrupt: Arc<AtomicBool>,
    background_started: bool,
    control_tx: mpsc::UnboundedSender<Control>,
    control_rx: mpsc::UnboundedReceiver<Control>,
}

impl<T: Task + ?Sized, S: PresentationSurface> ProgressTask<T, S> {
    /// Starts building a decorator around `inner` presenting on `surface`.
    pub fn builder(inner: Arc<T>, surface: S) -> ProgressTaskBuilder<T, S> {
        ProgressTaskBuilder::new(inner, surface)
    }

    pub(crate) fn from_parts(
        inner: Arc<T>,
        surface: S,
        opts: PresentationOptions,
        on_dismiss: Option<Box<dyn FnOnce()>>,
        bus: Option<Bus>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let name: Arc<str> = format!("progress({})", inner.name()).into();
        Self {
            affinity: Affinity::current(),
            name,
            inner,
            slot: SurfaceSlot::new(surface),
            opts,
            on_dismiss,
            bus,
            state: DecoratorState::Created,
            scale: ProgressScale::default(),
            token: CancellationToken::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            background_started: false,
            control_tx,
            control_rx,
        }
    }

    /// Diagnostic name: `progress(<inner name>)`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DecoratorState {
        self.state
    }

    /// Cloneable, `Send` control handle.
    pub fn handle(&self) -> ProgressTaskHandle {
        ProgressTaskHandle::new(self.control_tx.clone())
    }

    /// Requests cancellation before [`run`](Self::run).
    ///
    /// The inner task's entry point will never be invoked; `run` takes the
    /// early-cancel path and releases the surface.
    #[track_caller]
    pub fn cancel(&mut self) {
        self.affinity.assert_owner("ProgressTask::cancel");
        self.request_cancel();
    }

    /// Releases the surface now. The inner task is not affected.
    #[track_caller]
    pub fn force_dismiss(&mut self) {
        self.affinity.assert_owner("ProgressTask::force_dismiss");
        self.release_surface(true);
    }

    /// Runs the decorator to completion on the current thread.
    ///
    /// Exactly one terminal hook fires and the surface is released exactly once.
    ///
    /// # Panics
    /// If polled off the thread that built the task, or outside a tokio runtime.
    pub async fn run(mut self) -> Outcome<T::Output> {
        self.affinity.assert_owner("ProgressTask::run");
        while let Ok(ctrl) = self.control_rx.try_recv() {
            self.apply_control(ctrl);
        }
        if self.state == DecoratorState::CancelRequested {
            return self.on_early_cancelled(None);
        }

        self.on_started();
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let mut result_rx = self.submit(ProgressSink::new(progress_tx));

        let finished = loop {
            let step = tokio::select! {
                biased;
                Some(ctrl) = self.control_rx.recv() => Step::Control(ctrl),
                Some(update) = progress_rx.recv() => Step::Progress(update),
                res = &mut result_rx => Step::Finished(res),
            };
            match step {
                // A result already sitting in the channel wins over a late cancel.
                Step::Control(Control::Cancel) => match result_rx.try_recv() {
                    Ok(res) => {
                        debug!(task = %self.name, "cancel arrived after the worker finished");
                        break Ok(res);
                    }
                    Err(_) => self.request_cancel(),
                },
                Step::Control(ctrl) => self.apply_control(ctrl),
                Step::Progress(update) => self.apply_progress(update),
                Step::Finished(res) => break res,
            }
        };
        while let Ok(update) = progress_rx.try_recv() {
            self.apply_progress(update);
        }

        let result = finished.unwrap_or_else(|_| {
            Err(TaskError::Fatal {
                error: "worker panicked".into(),
            })
        });
        if self.state == DecoratorState::CancelRequested {
            self.on_early_cancelled(result.err())
        } else {
            self.on_early_post_run(result)
        }
    }

    /// Initializes and shows the surface, then marks the task started.
    fn on_started(&mut self) {
        self.state.advance(DecoratorState::Started);
        let handle = self.handle();
        let opts = &self.opts;
        let max = self.scale.presented_max();

        let shown = self.slot.apply(|s| {
            if let Some(title) = &opts.title {
                s.set_title(title);
            }
            if let Some(message) = &opts.message {
                s.set_message(message);
            }
            s.set_style(opts.style);
            s.set_max(max);
            s.set_progress(0);
            s.set_dismissable(false);
            if let Some(text) = &opts.cancel_text {
                s.set_cancel_action(CancelAction::new(text.clone(), handle));
            }
            s.show()
        });
        if let Some(Err(e)) = shown {
            warn!(task = %self.name, error = %e, "surface refused to show");
        }
        self.publish(Event::new(EventKind::TaskStarted));
    }

    fn submit(&mut self, sink: ProgressSink) -> oneshot::Receiver<WorkerResult<T::Output>> {
        self.state.advance(DecoratorState::Running);
        self.background_started = true;

        let (tx, rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        let ctx = TaskContext::new(self.token.clone(), Arc::clone(&self.interrupt), sink);
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(run_background(inner.as_ref(), ctx));
        });
        rx
    }

    fn apply_control(&mut self, ctrl: Control) {
        match ctrl {
            Control::Cancel => self.request_cancel(),
            Control::ForceDismiss => self.release_surface(true),
        }
    }

    fn apply_progress(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::Init(max) => self.on_progress_init(max),
            ProgressUpdate::Report(value) => self.on_progress(value),
        }
    }

    fn on_progress_init(&mut self, raw_max: u64) {
        self.scale = ProgressScale::new(raw_max);
        let max = self.scale.presented_max();
        self.slot.apply(|s| s.set_max(max));
        self.publish(Event::new(EventKind::TaskProgressInit).with_value(u64::from(max)));
    }

    fn on_progress(&mut self, raw: u64) {
        let value = self.scale.present(raw);
        self.slot.apply(|s| s.set_progress(value));
        self.publish(Event::new(EventKind::TaskProgress).with_value(u64::from(value)));
    }

    fn request_cancel(&mut self) {
        if !self.state.accepts_cancel() {
            debug!(task = %self.name, state = self.state.as_label(), "cancel ignored");
            return;
        }
        self.state.advance(DecoratorState::CancelRequested);
        self.token.cancel();
        let interrupt = self.opts.interrupt_on_cancel;
        if interrupt {
            self.interrupt.store(true, Ordering::Release);
        }

        let when = if self.background_started {
            if let Some(waiting) = &self.opts.waiting_cancel_message {
                self.slot.apply(|s| s.set_message(waiting));
            }
            "while_running"
        } else {
            "before_start"
        };
        self.inner.cancel(interrupt);
        debug!(task = %self.name, when, interrupt, "cancel requested");
        self.publish(Event::new(EventKind::TaskCancelRequested).with_reason(when));
    }

    /// Terminal hook for every run where a cancel was requested.
    fn on_early_cancelled(&mut self, err: Option<TaskError>) -> Outcome<T::Output> {
        self.state.advance(DecoratorState::Cancelled);
        let mut ev = Event::new(EventKind::TaskCancelled);
        if let Some(e) = &err {
            ev = ev.with_reason(e.as_message());
        }
        self.publish(ev);
        self.release_surface(false);
        Outcome::Cancelled(err)
    }

    /// Terminal hook for runs that finished without a cancel request.
    fn on_early_post_run(&mut self, result: WorkerResult<T::Output>) -> Outcome<T::Output> {
        let outcome = match result {
            Ok(value) => {
                self.state.advance(DecoratorState::Completed);
                self.publish(Event::new(EventKind::TaskCompleted));
                Outcome::Completed(value)
            }
            Err(e) => {
                self.state.advance(DecoratorState::Failed);
                warn!(task = %self.name, error = %e, "inner task failed");
                self.publish(Event::new(EventKind::TaskFailed).with_reason(e.as_message()));
                Outcome::Failed(e)
            }
        };
        self.release_surface(false);
        outcome
    }

    fn release_surface(&mut self, forced: bool) {
        let Some(mut surface) = self.slot.take() else {
            return;
        };
        if forced {
            self.publish(Event::new(EventKind::SurfaceForceDismissed));
        }
        match surface.dismiss() {
            Ok(()) => {
                self.publish(Event::new(EventKind::SurfaceReleased));
                if let Some(on_dismiss) = self.on_dismiss.take() {
                    on_dismiss();
                }
            }
            Err(SurfaceError::Detached) => {
                debug!(task = %self.name, "surface already detached");
                self.publish(Event::new(EventKind::SurfaceDetached));
            }
            Err(e) => {
                warn!(task = %self.name, error = %e, "surface release failed");
                self.publish(Event::new(EventKind::SurfaceDetached).with_reason(e.to_string()));
            }
        }
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_task(Arc::clone(&self.name)));
        }
    }
}

/// Calls the inner task's blocking entry point on the worker, unless cancel already landed.
fn run_background<T: Task + ?Sized>(inner: &T, ctx: TaskContext) -> WorkerResult<T::Output> {
    if ctx.is_cancelled() {
        return Err(TaskError::Canceled);
    }
    inner.run(ctx)
}

impl<T: Task + ?Sized, S: PresentationSurface> Drop for ProgressTask<T, S> {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            self.token.cancel();
        }
        self.release_surface(false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::progress::Style;
    use crate::progress::testkit::{RecordingSurface, SurfaceCall};
    use crate::tasks::{TaskFn, TaskRef};

    fn kinds(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(ev) => out.push(ev.kind),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => return out,
            }
        }
    }

    #[tokio::test]
    async fn scenario_b_progress_is_rescaled() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("download", |ctx: TaskContext| {
            ctx.progress().init(50_000);
            ctx.progress().report(25_000);
            Ok::<_, TaskError>("done")
        });
        let task = ProgressTask::builder(inner, surface)
            .style(Style::Progress)
            .title("Downloading")
            .build();
        assert_eq!(task.name(), "progress(download)");

        let out = task.run().await;
        assert!(matches!(out, Outcome::Completed("done")));

        let rec = rec.borrow();
        assert_eq!(rec.last_max(), Some(10_000));
        assert_eq!(rec.last_progress(), Some(5_000));
        assert_eq!(rec.dismissed, 1);
        assert!(rec.calls.contains(&SurfaceCall::Style(Style::Progress)));
        assert!(rec.calls.contains(&SurfaceCall::Dismissable(false)));
        assert!(rec.calls.contains(&SurfaceCall::Show));
    }

    #[tokio::test]
    async fn scenario_c_cancel_before_start_never_runs_inner() {
        let (surface, rec) = RecordingSurface::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let inner = TaskFn::arc("never", move |_ctx: TaskContext| {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, TaskError>(())
        });
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let mut task = ProgressTask::builder(inner, surface).with_bus(bus).build();

        task.cancel();
        assert_eq!(task.state(), DecoratorState::CancelRequested);
        let out = task.run().await;

        assert!(matches!(out, Outcome::Cancelled(None)));
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(rec.borrow().dismissed, 1);
        assert!(!rec.borrow().calls.contains(&SurfaceCall::Show));

        let seen = kinds(&mut rx);
        assert_eq!(
            seen,
            vec![
                EventKind::TaskCancelRequested,
                EventKind::TaskCancelled,
                EventKind::SurfaceReleased,
            ]
        );
    }

    #[tokio::test]
    async fn cancel_via_handle_before_run_takes_early_path() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("queued", |_ctx: TaskContext| Ok::<_, TaskError>(1));
        let task = ProgressTask::builder(inner, surface).build();
        assert!(task.handle().cancel());

        assert!(task.run().await.is_cancelled());
        assert_eq!(rec.borrow().dismissed, 1);
    }

    #[tokio::test]
    async fn failure_releases_once_and_keeps_error() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("broken", |_ctx: TaskContext| {
            Err::<(), _>(TaskError::Fail {
                error: "disk full".into(),
            })
        });
        let out = ProgressTask::builder(inner, surface).build().run().await;

        match out {
            Outcome::Failed(TaskError::Fail { error }) => assert_eq!(error, "disk full"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(rec.borrow().dismissed, 1);
    }

    #[tokio::test]
    async fn cancel_while_running_forwards_to_inner() {
        let (surface, rec) = RecordingSurface::new();
        let started = Arc::new(Notify::new());
        let signal = Arc::clone(&started);
        let inner = TaskFn::arc("spin", move |ctx: TaskContext| -> Result<(), TaskError> {
            signal.notify_one();
            loop {
                ctx.checkpoint()?;
                std::thread::sleep(Duration::from_millis(5));
            }
        });
        let task = ProgressTask::builder(inner, surface)
            .message("Working")
            .waiting_cancel_message("Stopping...")
            .interrupt_on_cancel(true)
            .build();
        let handle = task.handle();

        let (out, _) = tokio::join!(task.run(), async move {
            started.notified().await;
            assert!(handle.cancel());
        });

        assert!(matches!(out, Outcome::Cancelled(Some(TaskError::Interrupted))));
        let rec = rec.borrow();
        assert_eq!(rec.last_message(), Some("Stopping..."));
        assert_eq!(rec.dismissed, 1);
    }

    #[tokio::test]
    async fn value_returned_after_cancel_is_discarded() {
        let (surface, rec) = RecordingSurface::new();
        let started = Arc::new(Notify::new());
        let signal = Arc::clone(&started);
        let inner = TaskFn::arc("stubborn", move |ctx: TaskContext| {
            signal.notify_one();
            while !ctx.is_cancelled() {
                std::thread::sleep(Duration::from_millis(5));
            }
            Ok::<_, TaskError>(7)
        });
        let task = ProgressTask::builder(inner, surface).build();
        let handle = task.handle();

        let (out, _) = tokio::join!(task.run(), async move {
            started.notified().await;
            handle.cancel();
        });
        assert!(matches!(out, Outcome::Cancelled(None)));
        assert_eq!(rec.borrow().dismissed, 1);
    }

    #[tokio::test]
    async fn detached_surface_is_swallowed() {
        let (surface, rec) = RecordingSurface::new();
        rec.borrow_mut().detach_on_dismiss = true;
        let dismissed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&dismissed);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();

        let inner = TaskFn::arc("late", |_ctx: TaskContext| Ok::<_, TaskError>(()));
        let out = ProgressTask::builder(inner, surface)
            .on_dismiss(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_bus(bus)
            .build()
            .run()
            .await;

        assert!(out.is_completed());
        assert_eq!(rec.borrow().dismissed, 1);
        assert_eq!(dismissed.load(Ordering::SeqCst), 0);
        assert!(kinds(&mut rx).contains(&EventKind::SurfaceDetached));
    }

    #[tokio::test]
    async fn force_dismiss_keeps_inner_running() {
        let (surface, rec) = RecordingSurface::new();
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let (signal, gate) = (Arc::clone(&started), Arc::clone(&release));
        let inner = TaskFn::arc("bg", move |ctx: TaskContext| {
            signal.notify_one();
            futures::executor::block_on(gate.notified());
            ctx.progress().report(10);
            Ok::<_, TaskError>(99)
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let task = ProgressTask::builder(inner, surface)
            .on_dismiss(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        let handle = task.handle();

        let (out, _) = tokio::join!(task.run(), async move {
            started.notified().await;
            assert!(handle.force_dismiss());
            tokio::time::sleep(Duration::from_millis(20)).await;
            release.notify_one();
        });

        assert!(matches!(out, Outcome::Completed(99)));
        let rec = rec.borrow();
        assert_eq!(rec.dismissed, 1);
        assert_eq!(rec.last_progress(), Some(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_dismiss_before_run_skips_presentation() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("quiet", |_ctx: TaskContext| Ok::<_, TaskError>(()));
        let mut task = ProgressTask::builder(inner, surface).build();
        task.force_dismiss();
        task.force_dismiss();

        assert!(task.run().await.is_completed());
        let rec = rec.borrow();
        assert_eq!(rec.dismissed, 1);
        assert!(!rec.calls.contains(&SurfaceCall::Show));
    }

    #[tokio::test]
    async fn worker_panic_is_fatal() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("boom", |_ctx: TaskContext| -> Result<(), TaskError> {
            panic!("inner exploded")
        });
        let out = ProgressTask::builder(inner, surface).build().run().await;
        assert!(matches!(out, Outcome::Failed(TaskError::Fatal { .. })));
        assert_eq!(rec.borrow().dismissed, 1);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_a_noop() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("quick", |_ctx: TaskContext| Ok::<_, TaskError>(()));
        let task = ProgressTask::builder(inner, surface).build();
        let handle = task.handle();
        assert!(task.run().await.is_completed());
        assert!(!handle.cancel());
        assert!(handle.is_closed());
        assert_eq!(rec.borrow().dismissed, 1);
    }

    /// Blocks in `run` until the gate opens, then returns 7.
    struct Gated {
        gate: std::sync::Mutex<std::sync::mpsc::Receiver<()>>,
        cancels: AtomicUsize,
    }

    impl Task for Gated {
        type Output = u32;

        fn name(&self) -> &str {
            "gated"
        }

        fn run(&self, _ctx: TaskContext) -> Result<u32, TaskError> {
            let gate = self.gate.lock().map_err(|_| TaskError::Fatal {
                error: "gate poisoned".into(),
            })?;
            let _ = gate.recv();
            Ok(7)
        }

        fn cancel(&self, _interrupt: bool) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn cancel_racing_an_unobserved_result_keeps_the_value() {
        let (surface, rec) = RecordingSurface::new();
        let (open, gate) = std::sync::mpsc::channel();
        let inner = Arc::new(Gated {
            gate: std::sync::Mutex::new(gate),
            cancels: AtomicUsize::new(0),
        });
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let task = ProgressTask::builder(Arc::clone(&inner), surface)
            .waiting_cancel_message("Stopping...")
            .with_bus(bus)
            .build();
        let handle = task.handle();

        let (out, _) = tokio::join!(task.run(), async move {
            open.send(()).unwrap();
            // Hold the runtime thread so the worker's result is queued but not yet seen.
            std::thread::sleep(Duration::from_millis(100));
            assert!(handle.cancel());
        });

        assert!(matches!(out, Outcome::Completed(7)));
        assert_eq!(inner.cancels.load(Ordering::SeqCst), 0);
        let rec = rec.borrow();
        assert_eq!(rec.dismissed, 1);
        assert_ne!(rec.last_message(), Some("Stopping..."));

        let seen = kinds(&mut rx);
        assert!(!seen.contains(&EventKind::TaskCancelRequested));
        let terminal = seen.iter().filter(|k| {
            matches!(
                k,
                EventKind::TaskCompleted | EventKind::TaskCancelled | EventKind::TaskFailed
            )
        });
        assert_eq!(terminal.count(), 1);
        assert_eq!(seen.iter().filter(|&&k| k == EventKind::TaskCompleted).count(), 1);
        assert_eq!(seen.iter().filter(|&&k| k == EventKind::SurfaceReleased).count(), 1);
    }

    #[tokio::test]
    async fn cancel_action_is_wired_to_the_decorator() {
        let (surface, rec) = RecordingSurface::new();
        rec.borrow_mut().press_cancel_on_show = true;
        let inner = TaskFn::arc("pressable", |ctx: TaskContext| {
            while !ctx.is_cancelled() {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err::<(), _>(TaskError::Canceled)
        });
        let out = ProgressTask::builder(inner, surface)
            .cancel_text("Cancel")
            .build()
            .run()
            .await;

        assert!(matches!(out, Outcome::Cancelled(Some(TaskError::Canceled))));
        assert_eq!(rec.borrow().cancel_label.as_deref(), Some("Cancel"));
    }

    #[tokio::test]
    async fn accepts_shared_task_refs() {
        let (surface, _rec) = RecordingSurface::new();
        let inner: TaskRef<u8> = TaskFn::arc("shared", |_ctx: TaskContext| Ok::<_, TaskError>(8u8));
        let task = ProgressTask::builder(inner, surface).build();
        assert_eq!(task.name(), "progress(shared)");
        assert!(matches!(task.run().await, Outcome::Completed(8)));
    }

    #[tokio::test]
    async fn dropping_unrun_task_releases_surface() {
        let (surface, rec) = RecordingSurface::new();
        let inner = TaskFn::arc("dropped", |_ctx: TaskContext| Ok::<_, TaskError>(()));
        drop(ProgressTask::builder(inner, surface).build());
        assert_eq!(rec.borrow().dismissed, 1);
    }

    #[test]
    fn outcome_into_result() {
        assert_eq!(Outcome::Completed(3).into_result().unwrap(), 3);
        assert!(matches!(
            Outcome::<()>::Cancelled(None).into_result(),
            Err(TaskError::Canceled)
        ));
        assert!(Outcome::<()>::Failed(TaskError::Interrupted).is_failed());
    }
}
