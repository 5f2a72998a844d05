//! Recording surface shared by the progress tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SurfaceError;

use super::surface::{CancelAction, PresentationSurface, Style};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceCall {
    Title(String),
    Message(String),
    Style(Style),
    Max(u32),
    Progress(u32),
    Dismissable(bool),
    CancelAction(String),
    Show,
}

#[derive(Debug, Default)]
pub(crate) struct SurfaceRecord {
    pub(crate) calls: Vec<SurfaceCall>,
    pub(crate) dismissed: usize,
    pub(crate) detach_on_dismiss: bool,
    pub(crate) press_cancel_on_show: bool,
    pub(crate) cancel_label: Option<String>,
    action: Option<CancelAction>,
}

impl SurfaceRecord {
    pub(crate) fn last_max(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::Max(v) => Some(*v),
            _ => None,
        })
    }

    pub(crate) fn last_progress(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::Progress(v) => Some(*v),
            _ => None,
        })
    }

    pub(crate) fn last_message(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::Message(m) => Some(m.as_str()),
            _ => None,
        })
    }
}

pub(crate) struct RecordingSurface {
    rec: Rc<RefCell<SurfaceRecord>>,
}

impl RecordingSurface {
    pub(crate) fn new() -> (Self, Rc<RefCell<SurfaceRecord>>) {
        let rec = Rc::new(RefCell::new(SurfaceRecord::default()));
        (
            Self {
                rec: Rc::clone(&rec),
            },
            rec,
        )
    }

    fn push(&self, call: SurfaceCall) {
        self.rec.borrow_mut().calls.push(call);
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_title(&mut self, title: &str) {
        self.push(SurfaceCall::Title(title.to_owned()));
    }

    fn set_message(&mut self, message: &str) {
        self.push(SurfaceCall::Message(message.to_owned()));
    }

    fn set_style(&mut self, style: Style) {
        self.push(SurfaceCall::Style(style));
    }

    fn set_max(&mut self, max: u32) {
        self.push(SurfaceCall::Max(max));
    }

    fn set_progress(&mut self, value: u32) {
        self.push(SurfaceCall::Progress(value));
    }

    fn set_dismissable(&mut self, dismissable: bool) {
        self.push(SurfaceCall::Dismissable(dismissable));
    }

    fn set_cancel_action(&mut self, action: CancelAction) {
        let mut rec = self.rec.borrow_mut();
        rec.calls.push(SurfaceCall::CancelAction(action.label().to_owned()));
        rec.cancel_label = Some(action.label().to_owned());
        rec.action = Some(action);
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        let mut rec = self.rec.borrow_mut();
        rec.calls.push(SurfaceCall::Show);
        if rec.press_cancel_on_show {
            if let Some(action) = &rec.action {
                action.trigger();
            }
        }
        Ok(())
    }

    fn dismiss(&mut self) -> Result<(), SurfaceError> {
        let mut rec = self.rec.borrow_mut();
        rec.dismissed += 1;
        if rec.detach_on_dismiss {
            Err(SurfaceError::Detached)
        } else {
            Ok(())
        }
    }
}
