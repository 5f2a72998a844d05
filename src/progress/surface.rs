//! # Presentation surface contract.
//!
//! A [`PresentationSurface`] is the foreground object a [`ProgressTask`](crate::ProgressTask)
//! drives: title, message, style, range, value and a cancel affordance. It
//! lives on the presentation thread and is never sent to a worker.
//!
//! [`SurfaceSlot`] owns the surface on behalf of the decorator and makes
//! release exactly-once: the first [`SurfaceSlot::take`] empties it, every
//! later call sees `None`.

use crate::error::SurfaceError;

use super::handle::ProgressTaskHandle;

/// Visual style of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Indeterminate spinner.
    #[default]
    Spin,
    /// Determinate bar using max/progress.
    Progress,
}

/// Cancel affordance wired to a running decorator.
///
/// Surfaces call [`trigger`](CancelAction::trigger) when the user presses the
/// cancel control.
#[derive(Debug, Clone)]
pub struct CancelAction {
    label: String,
    handle: ProgressTaskHandle,
}

impl CancelAction {
    pub(crate) fn new(label: String, handle: ProgressTaskHandle) -> Self {
        Self { label, handle }
    }

    /// Text shown on the cancel control.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Requests cancellation of the decorator. Returns `false` once it has finished.
    pub fn trigger(&self) -> bool {
        self.handle.cancel()
    }
}

/// Foreground presentation of one progress task.
pub trait PresentationSurface {
    /// Sets the title.
    fn set_title(&mut self, title: &str);

    /// Sets the body message.
    fn set_message(&mut self, message: &str);

    /// Sets the visual style.
    fn set_style(&mut self, style: Style);

    /// Sets the presented maximum (`<= PRESENTATION_MAX`).
    fn set_max(&mut self, max: u32);

    /// Sets the presented value (`<= max`).
    fn set_progress(&mut self, value: u32);

    /// Enables or disables dismissal through side channels (back key, outside tap).
    fn set_dismissable(&mut self, dismissable: bool);

    /// Installs the cancel affordance.
    fn set_cancel_action(&mut self, action: CancelAction);

    /// Makes the surface visible.
    fn show(&mut self) -> Result<(), SurfaceError>;

    /// Hides and releases the surface.
    ///
    /// Returns [`SurfaceError::Detached`] if the host context is already gone.
    fn dismiss(&mut self) -> Result<(), SurfaceError>;
}

/// Exactly-once owner of a surface.
#[derive(Debug)]
pub struct SurfaceSlot<S> {
    surface: Option<S>,
}

impl<S: PresentationSurface> SurfaceSlot<S> {
    /// Wraps an attached surface.
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    /// True until the surface is taken for release.
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Runs `f` against the surface if it is still attached.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.surface.as_mut().map(f)
    }

    /// Takes the surface for release; `None` if it was already taken.
    pub fn take(&mut self) -> Option<S> {
        self.surface.take()
    }
}
