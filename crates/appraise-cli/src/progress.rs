//! indicatif-backed progress tracker: one overall bar plus a transient bar
//! per in-flight test case.

use appraise_core::progress::{ProgressTracker, ProgressUpdate, TaskId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub(crate) struct IndicatifProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    tasks: Mutex<HashMap<u64, ProgressBar>>,
    next_id: AtomicU64,
}

impl IndicatifProgress {
    /// `total` is the overall unit count: cases × runs.
    pub(crate) fn new(total: u64) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total));
        overall.set_style(
            ProgressStyle::with_template("{prefix:12} [{bar:30}] {pos}/{len}")
                .expect("overall progress template")
                .progress_chars("=> "),
        );
        overall.set_prefix("Overall");
        Self {
            multi,
            overall,
            tasks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn finish(&self) {
        self.overall.finish();
    }
}

impl ProgressTracker for IndicatifProgress {
    fn add_task(&self, description: &str) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let bar = self.multi.insert_before(&self.overall, ProgressBar::new(100));
        bar.set_style(
            ProgressStyle::with_template("{msg:40} [{bar:30}] {pos:>3}%")
                .expect("task progress template")
                .progress_chars("=> "),
        );
        bar.set_message(description.to_string());
        self.tasks.lock().expect("progress task map").insert(id, bar);
        TaskId(id)
    }

    fn update(&self, task: TaskId, update: ProgressUpdate) {
        let tasks = self.tasks.lock().expect("progress task map");
        let Some(bar) = tasks.get(&task.0) else {
            return;
        };
        if let Some(desc) = update.description {
            bar.set_message(desc);
        }
        if let Some(completed) = update.completed {
            bar.set_position(completed as u64);
        }
        if let Some(advance) = update.advance {
            bar.inc(advance as u64);
        }
    }

    fn remove_task(&self, task: TaskId) {
        if let Some(bar) = self.tasks.lock().expect("progress task map").remove(&task.0) {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    fn advance_overall(&self, amount: f64) {
        self.overall.inc(amount as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_are_tracked_and_removed() {
        let progress = IndicatifProgress::new(2);
        let a = progress.add_task("Test 1");
        let b = progress.add_task("Test 2");
        assert_ne!(a, b);
        progress.update(a, ProgressUpdate::at(40.0, "Test 1: Evaluating..."));
        progress.remove_task(a);
        progress.remove_task(b);
        assert!(progress.tasks.lock().unwrap().is_empty());
        progress.advance_overall(2.0);
        progress.finish();
    }
}
