use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use molgrid::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const TICK: Duration = Duration::from_millis(80);
const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg}";
const BAR_TEMPLATE: &str = "{prefix:.bold} {msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({rate})";

/// Renders loader progress events on stderr: a spinner while a phase runs, a bar while a
/// counted task runs, and the current batch/epoch in the bar prefix.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |event| match bar.lock() {
            Ok(bar) => apply(&bar, event),
            Err(_) => warn!("Progress bar lock poisoned; dropping event {:?}", event),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(spinner_style());
            bar.set_message(name);
            bar.enable_steady_tick(TICK);
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("✓ Done");
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_style(bar_style());
            bar.set_length(total_steps);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.finish();
        }
        Progress::BatchReady { batch, epoch } => {
            bar.set_prefix(format!("epoch {}", epoch));
            bar.set_message(format!("batch {}", batch));
        }
        Progress::Message(msg) if bar.is_finished() => bar.set_message(msg),
        Progress::Message(msg) => bar.println(format!("  {}", msg)),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("rate", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}/s", state.per_sec());
        })
        .progress_chars("=> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn starts_finished_and_empty() {
        let handler = hidden();
        let bar = handler.bar.lock().unwrap();
        assert_eq!(bar.length(), Some(0));
        assert!(bar.is_finished());
    }

    #[test]
    fn batch_events_update_prefix_and_message() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Drawing Batches",
        });
        assert_eq!(handler.bar.lock().unwrap().message(), "Drawing Batches");

        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement);
        callback(Progress::BatchReady { batch: 3, epoch: 1 });
        {
            let bar = handler.bar.lock().unwrap();
            assert_eq!(bar.length(), Some(4));
            assert_eq!(bar.position(), 1);
            assert_eq!(bar.prefix(), "epoch 1");
            assert_eq!(bar.message(), "batch 3");
        }

        callback(Progress::TaskFinish);
        {
            let bar = handler.bar.lock().unwrap();
            assert!(bar.is_finished());
            assert_eq!(bar.position(), 4);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.bar.lock().unwrap().message(), "✓ Done");
    }

    #[test]
    fn callback_can_move_to_worker_threads() {
        let handler = hidden();
        let callback = handler.get_callback();

        std::thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Caching Grids",
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.bar.lock().unwrap().is_finished());
    }
}
