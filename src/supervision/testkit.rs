//! Recording fakes shared by the supervision tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::ProcessDescriptor;
use crate::error::HostError;

use super::{CompanionHost, ExclusiveResource, ResourceHandle, ResourceKind};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) struct RecordingHost {
    pub(crate) log: Log,
    pub(crate) fail_start: bool,
}

impl CompanionHost for RecordingHost {
    fn start_companion(&self, d: &ProcessDescriptor) -> Result<(), HostError> {
        self.log.borrow_mut().push(format!("start:{}", d.name()));
        if self.fail_start {
            return Err(HostError::CompanionStart {
                name: d.name().to_string(),
                reason: "refused".into(),
            });
        }
        Ok(())
    }

    fn stop_companion(&self, d: &ProcessDescriptor) -> Result<(), HostError> {
        self.log.borrow_mut().push(format!("stop:{}", d.name()));
        Ok(())
    }
}

pub(crate) struct RecordingResource {
    pub(crate) kind: ResourceKind,
    pub(crate) log: Log,
    pub(crate) issued: Rc<Cell<u32>>,
    pub(crate) fail: Rc<Cell<bool>>,
}

impl RecordingResource {
    pub(crate) fn new(kind: ResourceKind, log: &Log) -> Self {
        Self {
            kind,
            log: Rc::clone(log),
            issued: Rc::new(Cell::new(0)),
            fail: Rc::new(Cell::new(false)),
        }
    }
}

impl ExclusiveResource for RecordingResource {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn acquire(&self) -> Result<Box<dyn ResourceHandle>, HostError> {
        if self.fail.get() {
            return Err(HostError::Acquire {
                kind: self.kind,
                reason: "denied".into(),
            });
        }
        let id = self.issued.get() + 1;
        self.issued.set(id);
        self.log
            .borrow_mut()
            .push(format!("acquire:{}#{id}", self.kind));
        Ok(Box::new(RecordingHandle {
            kind: self.kind,
            id,
            log: Rc::clone(&self.log),
        }))
    }
}

struct RecordingHandle {
    kind: ResourceKind,
    id: u32,
    log: Log,
}

impl ResourceHandle for RecordingHandle {
    fn release(self: Box<Self>) -> Result<(), HostError> {
        self.log
            .borrow_mut()
            .push(format!("release:{}#{}", self.kind, self.id));
        Ok(())
    }
}
