//! # Exclusive resources held while work is active.
//!
//! A [`ResourceMask`] selects which [`ResourceKind`]s a supervisor holds. For
//! each kind an [`ExclusiveResource`] provider hands out one fresh
//! [`ResourceHandle`] per acquisition cycle; the handle is consumed by
//! [`ResourceHandle::release`], so a released handle cannot be used again.
//!
//! ## Bits
//! ```text
//! 0x01  Wake     (primary: keeps the device awake)
//! 0x02  Network  (secondary: keeps the network radio up)
//! ```

use std::fmt;
use std::ops::BitOr;

use crate::error::HostError;

/// Kind of exclusive resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Primary resource: prevents the host from sleeping.
    Wake,
    /// Secondary resource: keeps the network link active.
    Network,
}

impl ResourceKind {
    /// All kinds in acquisition order.
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Wake, ResourceKind::Network];

    /// Mask bit for this kind.
    pub const fn bit(self) -> u32 {
        match self {
            ResourceKind::Wake => 0x01,
            ResourceKind::Network => 0x02,
        }
    }

    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResourceKind::Wake => "wake",
            ResourceKind::Network => "network",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Bit-set of [`ResourceKind`]s.
///
/// Unknown bits are dropped on construction.
///
/// # Example
/// ```
/// use lifeline::{ResourceKind, ResourceMask};
///
/// let mask = ResourceMask::WAKE | ResourceMask::NETWORK;
/// assert!(mask.contains(ResourceKind::Network));
/// assert_eq!(mask.kinds().count(), 2);
/// assert_eq!(ResourceMask::from_bits(0xff), ResourceMask::ALL);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceMask(u32);

impl ResourceMask {
    /// No exclusive resources.
    pub const NONE: ResourceMask = ResourceMask(0);
    /// Wake resource only.
    pub const WAKE: ResourceMask = ResourceMask(0x01);
    /// Network resource only.
    pub const NETWORK: ResourceMask = ResourceMask(0x02);
    /// Every known resource.
    pub const ALL: ResourceMask = ResourceMask(0x03);

    /// Builds a mask from raw bits, ignoring unknown ones.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if no kind is selected.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if `kind` is selected.
    pub const fn contains(self, kind: ResourceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Selected kinds in acquisition order.
    pub fn kinds(self) -> impl Iterator<Item = ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl BitOr for ResourceMask {
    type Output = ResourceMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ResourceMask(self.0 | rhs.0)
    }
}

impl From<ResourceKind> for ResourceMask {
    fn from(kind: ResourceKind) -> Self {
        ResourceMask(kind.bit())
    }
}

/// Provider of one exclusive resource kind.
///
/// Each call to [`acquire`](ExclusiveResource::acquire) must return a brand-new
/// handle. Providers may refuse to re-arm a handle that was already released;
/// the supervisor never asks them to.
pub trait ExclusiveResource {
    /// Kind this provider hands out.
    fn kind(&self) -> ResourceKind;

    /// Acquires a fresh handle for one active cycle.
    fn acquire(&self) -> Result<Box<dyn ResourceHandle>, HostError>;
}

/// One acquisition of an exclusive resource.
pub trait ResourceHandle {
    /// Releases the resource, consuming the handle.
    fn release(self: Box<Self>) -> Result<(), HostError>;
}
