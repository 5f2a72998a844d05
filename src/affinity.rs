//! # Owner-thread affinity.
//!
//! [`Affinity`] pins a component to the thread that created it. It is `!Send`
//! and `!Sync`, so any struct embedding it cannot leave that thread, and
//! [`Affinity::assert_owner`] turns a call from any other thread into a panic.

use std::marker::PhantomData;
use std::thread::{self, ThreadId};

/// Records the owner thread of a single-threaded component.
#[derive(Debug)]
pub(crate) struct Affinity {
    owner: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl Affinity {
    /// Binds to the calling thread.
    pub(crate) fn current() -> Self {
        Self {
            owner: thread::current().id(),
            _not_send: PhantomData,
        }
    }

    /// True if the calling thread is the owner.
    #[inline]
    pub(crate) fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panics unless called from the owner thread.
    #[inline]
    #[track_caller]
    pub(crate) fn assert_owner(&self, op: &'static str) {
        assert!(
            self.is_owner(),
            "{op} must run on owner thread {:?}, called from {:?}",
            self.owner,
            thread::current().id()
        );
    }
}
