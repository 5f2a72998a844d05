//! # Life Support Example
//!
//! Attaches a [`ResourceSupervisor`] to a [`LocalQueue`] and shows that the
//! companion and the wake resource follow queue occupancy:
//! - pushing the first task starts the companion and acquires a fresh wake handle
//! - further tasks only move the queue
//! - draining the queue releases the handle and stops the companion
//!
//! A custom subscriber counts active periods from the event bus.
//!
//! ## Run
//! ```bash
//! cargo run --example life_support
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lifeline::{
    Event, EventKind, ExclusiveResource, HostError, LocalQueue, ProcessDescriptor, ResourceHandle,
    ResourceKind, ResourceMask, ResourceSupervisor, Subscribe, SupervisorConfig,
};

struct PeriodCounter {
    periods: AtomicU64,
    acquisitions: AtomicU64,
}

#[async_trait::async_trait]
impl Subscribe for PeriodCounter {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::LifeStarted => {
                self.periods.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::ResourceAcquired => {
                self.acquisitions.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }
    fn name(&self) -> &'static str {
        "period-counter"
    }
}

/// Wake lock that prints its lifecycle.
struct PrintWake {
    issued: Cell<u32>,
}

struct PrintWakeHandle(u32);

impl ExclusiveResource for PrintWake {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Wake
    }

    fn acquire(&self) -> Result<Box<dyn ResourceHandle>, HostError> {
        let id = self.issued.get() + 1;
        self.issued.set(id);
        println!(" ├─► wake lock #{id} acquired");
        Ok(Box::new(PrintWakeHandle(id)))
    }
}

impl ResourceHandle for PrintWakeHandle {
    fn release(self: Box<Self>) -> Result<(), HostError> {
        println!(" ├─► wake lock #{} released", self.0);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let counter = Arc::new(PeriodCounter {
        periods: AtomicU64::new(0),
        acquisitions: AtomicU64::new(0),
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![counter.clone()];

    let cfg = SupervisorConfig::new(ProcessDescriptor::named("sync-daemon"), ResourceMask::WAKE);
    let sup = ResourceSupervisor::builder(cfg)
        .with_resource(PrintWake {
            issued: Cell::new(0),
        })
        .with_subscribers(subs)
        .build()?;

    let queue = Rc::new(LocalQueue::new());
    let attachment = sup.attach(queue.clone());

    for round in 1..=2 {
        println!("Round {round}:");
        queue.push("fetch");
        queue.push("index");
        println!(" ├─► active={} balance={}", sup.is_active(), sup.balance());

        while let Some(task) = queue.begin_next() {
            tokio::time::sleep(Duration::from_millis(50)).await;
            queue.finish(&task);
        }
        println!(" └─► active={}", sup.is_active());
    }

    sup.detach(attachment);
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!();
    println!("Periods:");
    println!(" ├─► Active periods: {}", counter.periods.load(Ordering::Relaxed));
    println!(" └─► Acquisitions:   {}", counter.acquisitions.load(Ordering::Relaxed));
    Ok(())
}
