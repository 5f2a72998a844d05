//! # Progress Task Example
//!
//! Wraps blocking work in [`ProgressTask`] and renders it on a terminal surface.
//!
//! Two runs:
//! 1. a checksum over 50_000 blocks; progress is rescaled onto `0..=10000`
//! 2. the same task cancelled through its handle while running
//!
//! Lifecycle events are printed by the built-in `LogWriter`.
//!
//! ## Run
//! ```bash
//! cargo run --example progress_task --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use lifeline::{
    Bus, CancelAction, LogWriter, Outcome, PresentationSurface, ProgressTask, Style, Subscribe,
    SubscriberSet, SurfaceError, TaskContext, TaskError, TaskFn,
};

/// Surface that prints to the terminal.
#[derive(Default)]
struct TerminalSurface {
    max: u32,
    last_percent: u32,
    cancel: Option<CancelAction>,
}

impl PresentationSurface for TerminalSurface {
    fn set_title(&mut self, title: &str) {
        println!("== {title} ==");
    }

    fn set_message(&mut self, message: &str) {
        println!("   {message}");
    }

    fn set_style(&mut self, _style: Style) {}

    fn set_max(&mut self, max: u32) {
        self.max = max;
    }

    fn set_progress(&mut self, value: u32) {
        if self.max == 0 {
            return;
        }
        let percent = value * 100 / self.max;
        if percent >= self.last_percent + 25 {
            self.last_percent = percent;
            println!("   {percent:>3}% ({value}/{})", self.max);
        }
    }

    fn set_dismissable(&mut self, _dismissable: bool) {}

    fn set_cancel_action(&mut self, action: CancelAction) {
        println!("   [{}]", action.label());
        self.cancel = Some(action);
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn dismiss(&mut self) -> Result<(), SurfaceError> {
        println!("== closed ==");
        Ok(())
    }
}

fn checksum() -> Arc<TaskFn<impl Fn(TaskContext) -> Result<u64, TaskError> + Send + Sync>> {
    TaskFn::arc("checksum", |ctx: TaskContext| {
        const BLOCKS: u64 = 50_000;
        ctx.progress().init(BLOCKS);
        let mut sum = 0u64;
        for block in 1..=BLOCKS {
            ctx.checkpoint()?;
            sum = sum.wrapping_mul(31).wrapping_add(block);
            if block % 500 == 0 {
                ctx.progress().report(block);
                std::thread::sleep(Duration::from_millis(2));
            }
        }
        Ok(sum)
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let bus = Bus::default();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let set = Arc::new(SubscriberSet::new(subs, bus.clone()));
    let _listener = set.listen(&bus);

    let outcome = ProgressTask::builder(checksum(), TerminalSurface::default())
        .style(Style::Progress)
        .title("Verifying archive")
        .message("Hashing blocks...")
        .cancel_text("Cancel")
        .with_bus(bus.clone())
        .build()
        .run()
        .await;
    println!("first run: {:?}", outcome.into_result()?);

    let task = ProgressTask::builder(checksum(), TerminalSurface::default())
        .style(Style::Progress)
        .title("Verifying archive (again)")
        .waiting_cancel_message("Stopping...")
        .interrupt_on_cancel(true)
        .on_dismiss(|| println!("   surface released"))
        .with_bus(bus.clone())
        .build();
    let handle = task.handle();
    let (outcome, _) = tokio::join!(task.run(), async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.cancel();
    });
    match outcome {
        Outcome::Cancelled(err) => println!("second run cancelled: {err:?}"),
        other => println!("second run: {other:?}"),
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
