//! # ResourceSupervisor: keeps a companion and exclusive resources alive while work is active.
//!
//! The supervisor is a balanced start/stop counter owned by one thread. Only the
//! occupancy edges touch the host:
//!
//! ```text
//! start()  balance 0 → 1 ──► CompanionHost::start_companion(descriptor)
//!                        └─► ExclusiveResource::acquire()  (fresh handle per kind in mask)
//! start()  balance n → n+1   (no host calls)
//! stop()   balance n+1 → n   (no host calls)
//! stop()   balance 1 → 0 ──► ResourceHandle::release(self)  (reverse acquisition order)
//!                        └─► CompanionHost::stop_companion(descriptor)
//! stop()   balance 0      ──► panic (unbalanced stop)
//! ```
//!
//! Host failures are logged, published on the [`Bus`] and otherwise ignored:
//! the counter always moves, and a kind whose acquire failed is simply not
//! held for that cycle.
//!
//! ## Example
//! ```rust
//! use lifeline::{ProcessDescriptor, ResourceMask, ResourceSupervisor, SupervisorConfig};
//!
//! let cfg = SupervisorConfig::new(ProcessDescriptor::named("sync"), ResourceMask::NONE);
//! let sup = ResourceSupervisor::builder(cfg).build().unwrap();
//!
//! sup.start();
//! sup.start();
//! assert_eq!(sup.balance(), 2);
//! sup.stop();
//! sup.stop();
//! assert!(!sup.is_active());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::affinity::Affinity;
use crate::config::{ProcessDescriptor, SupervisorConfig};
use crate::error::{BuildError, HostError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::companion::{CompanionHost, ProcessCompanion};
use super::resource::{ExclusiveResource, ResourceHandle, ResourceKind, ResourceMask};

/// Handle held for one acquisition cycle.
struct Held {
    kind: ResourceKind,
    handle: Box<dyn ResourceHandle>,
}

/// Reference-counted owner of a companion process and exclusive resources.
///
/// `!Send`/`!Sync`: every method must run on the thread that built it, which
/// is additionally asserted at each entry point.
pub struct ResourceSupervisor {
    affinity: Affinity,
    descriptor: ProcessDescriptor,
    companion: Box<dyn CompanionHost>,
    providers: Vec<Box<dyn ExclusiveResource>>,
    held: RefCell<Vec<Held>>,
    balance: Cell<usize>,
    cycle: Cell<u64>,
    bus: Bus,
    subs: Option<(Arc<SubscriberSet>, JoinHandle<()>)>,
}

impl ResourceSupervisor {
    /// Starts building a supervisor from `cfg`.
    pub fn builder(cfg: SupervisorConfig) -> ResourceSupervisorBuilder {
        ResourceSupervisorBuilder::new(cfg)
    }

    /// Registers one unit of active work.
    ///
    /// On the 0→1 edge starts the companion and acquires a fresh handle for
    /// every configured resource kind.
    ///
    /// # Panics
    /// If called off the owner thread.
    #[track_caller]
    pub fn start(&self) {
        self.affinity.assert_owner("ResourceSupervisor::start");
        let prev = self.balance.get();
        self.balance.set(prev + 1);
        if prev == 0 {
            self.bring_up();
        }
    }

    /// Unregisters one unit of active work.
    ///
    /// On the 1→0 edge releases every held handle and stops the companion.
    ///
    /// # Panics
    /// If called off the owner thread, or without a matching [`start`](Self::start).
    #[track_caller]
    pub fn stop(&self) {
        self.affinity.assert_owner("ResourceSupervisor::stop");
        let prev = self.balance.get();
        assert!(
            prev > 0,
            "ResourceSupervisor::stop called without a matching start (companion '{}')",
            self.descriptor.name()
        );
        self.balance.set(prev - 1);
        if prev == 1 {
            self.wind_down();
        }
    }

    /// Current balance of `start` over `stop` calls.
    pub fn balance(&self) -> usize {
        self.balance.get()
    }

    /// True while the balance is non-zero.
    pub fn is_active(&self) -> bool {
        self.balance.get() > 0
    }

    /// Number of completed 0→1 edges.
    pub fn cycle(&self) -> u64 {
        self.cycle.get()
    }

    /// Resource kinds currently held, in acquisition order.
    pub fn held_kinds(&self) -> Vec<ResourceKind> {
        self.held.borrow().iter().map(|h| h.kind).collect()
    }

    /// Companion descriptor.
    pub fn descriptor(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    /// Event bus this supervisor publishes on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub(crate) fn assert_owner(&self, op: &'static str) {
        self.affinity.assert_owner(op);
    }

    pub(crate) fn publish(&self, kind: EventKind) {
        self.bus
            .publish(Event::new(kind).with_task(self.descriptor.name().to_owned()));
    }

    fn bring_up(&self) {
        let cycle = self.cycle.get() + 1;
        self.cycle.set(cycle);
        let name = self.descriptor.name();
        debug!(companion = name, cycle, "occupancy rose, bringing up");
        self.bus.publish(
            Event::new(EventKind::LifeStarted)
                .with_task(name.to_owned())
                .with_value(1),
        );

        self.publish(EventKind::CompanionStartRequested);
        if let Err(e) = self.companion.start_companion(&self.descriptor) {
            self.companion_failed(e);
        }

        let mut acquired = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let kind = provider.kind();
            match provider.acquire() {
                Ok(handle) => {
                    self.bus.publish(
                        Event::new(EventKind::ResourceAcquired)
                            .with_resource(kind)
                            .with_value(cycle),
                    );
                    acquired.push(Held { kind, handle });
                }
                Err(e) => self.resource_failed(kind, e),
            }
        }
        *self.held.borrow_mut() = acquired;
    }

    fn wind_down(&self) {
        let cycle = self.cycle.get();
        let name = self.descriptor.name();
        debug!(companion = name, cycle, "occupancy fell, winding down");

        let held = std::mem::take(&mut *self.held.borrow_mut());
        for Held { kind, handle } in held.into_iter().rev() {
            match handle.release() {
                Ok(()) => self.bus.publish(
                    Event::new(EventKind::ResourceReleased)
                        .with_resource(kind)
                        .with_value(cycle),
                ),
                Err(e) => self.resource_failed(kind, e),
            }
        }

        self.publish(EventKind::CompanionStopRequested);
        if let Err(e) = self.companion.stop_companion(&self.descriptor) {
            self.companion_failed(e);
        }
        self.bus.publish(
            Event::new(EventKind::LifeStopped)
                .with_task(name.to_owned())
                .with_value(0),
        );
    }

    fn companion_failed(&self, e: HostError) {
        warn!(companion = self.descriptor.name(), error = %e, "companion host failed");
        self.bus.publish(
            Event::new(EventKind::CompanionFailed)
                .with_task(self.descriptor.name().to_owned())
                .with_reason(e.as_message()),
        );
    }

    fn resource_failed(&self, kind: ResourceKind, e: HostError) {
        warn!(resource = kind.as_label(), error = %e, "exclusive resource failed");
        self.bus.publish(
            Event::new(EventKind::ResourceFailed)
                .with_resource(kind)
                .with_reason(e.as_message()),
        );
    }
}

impl Drop for ResourceSupervisor {
    fn drop(&mut self) {
        if self.balance.get() > 0 {
            warn!(
                companion = self.descriptor.name(),
                balance = self.balance.get(),
                "supervisor dropped while active; releasing"
            );
            self.balance.set(0);
            self.wind_down();
        }
        if let Some((_, listener)) = self.subs.take() {
            listener.abort();
        }
    }
}

/// Builder for [`ResourceSupervisor`].
///
/// Defaults: [`ProcessCompanion`] as host, no resource providers, no
/// subscribers, a fresh bus sized by `cfg.bus_capacity`.
pub struct ResourceSupervisorBuilder {
    cfg: SupervisorConfig,
    companion: Option<Box<dyn CompanionHost>>,
    providers: Vec<Box<dyn ExclusiveResource>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Option<Bus>,
}

impl ResourceSupervisorBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            companion: None,
            providers: Vec::new(),
            subscribers: Vec::new(),
            bus: None,
        }
    }

    /// Sets the host that starts and stops the companion.
    pub fn with_companion_host(mut self, host: impl CompanionHost + 'static) -> Self {
        self.companion = Some(Box::new(host));
        self
    }

    /// Registers a provider for one resource kind.
    ///
    /// Providers for kinds outside the configured mask are ignored. If several
    /// providers share a kind, the first one wins.
    pub fn with_resource(mut self, provider: impl ExclusiveResource + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscriber workers are tokio tasks, so `build` must then run inside a
    /// tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Publishes on an existing bus instead of creating one.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates the configuration and builds the supervisor on the calling thread.
    ///
    /// # Errors
    /// - [`BuildError::EmptyDescriptor`] if the companion name is empty
    /// - [`BuildError::MissingResource`] if the mask selects a kind with no provider
    pub fn build(self) -> Result<Rc<ResourceSupervisor>, BuildError> {
        if self.cfg.companion.name().trim().is_empty() {
            return Err(BuildError::EmptyDescriptor);
        }

        let mask: ResourceMask = self.cfg.resources;
        let mut pool = self.providers;
        let mut providers = Vec::new();
        for kind in mask.kinds() {
            let idx = pool
                .iter()
                .position(|p| p.kind() == kind)
                .ok_or(BuildError::MissingResource { kind })?;
            providers.push(pool.remove(idx));
        }

        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        let subs = if self.subscribers.is_empty() {
            None
        } else {
            let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
            let listener = set.listen(&bus);
            Some((set, listener))
        };
        let companion = self
            .companion
            .unwrap_or_else(|| Box::new(ProcessCompanion::new()));

        Ok(Rc::new(ResourceSupervisor {
            affinity: Affinity::current(),
            descriptor: self.cfg.companion,
            companion,
            providers,
            held: RefCell::new(Vec::new()),
            balance: Cell::new(0),
            cycle: Cell::new(0),
            bus,
            subs,
        }))
    }
}
