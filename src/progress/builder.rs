//! # ProgressTask construction.
//!
//! [`ProgressTaskBuilder`] collects the [`PresentationOptions`], an optional
//! on-dismiss callback and an optional [`Bus`], then builds a
//! [`ProgressTask`] bound to the calling (presentation) thread.

use std::sync::Arc;

use crate::events::Bus;
use crate::tasks::Task;

use super::decorator::ProgressTask;
use super::surface::{PresentationSurface, Style};

/// Presentation settings applied when the task starts.
///
/// ## Field semantics
/// - `style`: spinner or determinate bar (default `Spin`)
/// - `interrupt_on_cancel`: forwarded verbatim to the inner task's cancel
/// - `title` / `message`: set on the surface before it is shown
/// - `cancel_text`: if set, a cancel affordance with this label is installed
/// - `waiting_cancel_message`: replaces the message once a cancel is pending
#[derive(Debug, Clone, Default)]
pub struct PresentationOptions {
    /// Visual style.
    pub style: Style,
    /// Interrupt blocking work on cancel.
    pub interrupt_on_cancel: bool,
    /// Surface title.
    pub title: Option<String>,
    /// Surface message.
    pub message: Option<String>,
    /// Label of the cancel affordance.
    pub cancel_text: Option<String>,
    /// Message shown while waiting for a cancelled task to return.
    pub waiting_cancel_message: Option<String>,
}

/// Builder for [`ProgressTask`].
pub struct ProgressTaskBuilder<T: Task + ?Sized, S: PresentationSurface> {
    inner: Arc<T>,
    surface: S,
    opts: PresentationOptions,
    on_dismiss: Option<Box<dyn FnOnce()>>,
    bus: Option<Bus>,
}

impl<T: Task + ?Sized, S: PresentationSurface> ProgressTaskBuilder<T, S> {
    pub(crate) fn new(inner: Arc<T>, surface: S) -> Self {
        Self {
            inner,
            surface,
            opts: PresentationOptions::default(),
            on_dismiss: None,
            bus: None,
        }
    }

    /// Replaces all presentation options at once.
    pub fn options(mut self, opts: PresentationOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Sets the visual style.
    pub fn style(mut self, style: Style) -> Self {
        self.opts.style = style;
        self
    }

    /// Interrupt blocking work when cancelling.
    pub fn interrupt_on_cancel(mut self, interrupt: bool) -> Self {
        self.opts.interrupt_on_cancel = interrupt;
        self
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.opts.title = Some(title.into());
        self
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.opts.message = Some(message.into());
        self
    }

    /// Installs a cancel affordance with this label.
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.opts.cancel_text = Some(text.into());
        self
    }

    /// Message shown after cancel while the inner task winds down.
    pub fn waiting_cancel_message(mut self, message: impl Into<String>) -> Self {
        self.opts.waiting_cancel_message = Some(message.into());
        self
    }

    /// Callback run once after the surface is released successfully.
    pub fn on_dismiss(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_dismiss = Some(Box::new(f));
        self
    }

    /// Publishes lifecycle events on `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the decorator on the calling thread.
    pub fn build(self) -> ProgressTask<T, S> {
        ProgressTask::from_parts(self.inner, self.surface, self.opts, self.on_dismiss, self.bus)
    }
}
