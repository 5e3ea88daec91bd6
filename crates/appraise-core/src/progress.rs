//! Progress-tracking contract. The engine reports stage transitions through
//! this trait in completion order; rendering lives outside the core (the CLI
//! ships an indicatif-backed implementation, tests record updates).

use std::sync::Arc;

/// Handle for one named progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// One update to a task. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub description: Option<String>,
    /// Absolute completion on a 0..=100 scale.
    pub completed: Option<f64>,
    /// Relative advance on the same scale.
    pub advance: Option<f64>,
}

impl ProgressUpdate {
    pub fn at(completed: f64, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            completed: Some(completed),
            advance: None,
        }
    }
}

/// Capability for creating/updating/removing named progress indicators and
/// advancing an overall counter. Shared across all pipelines of a run, so the
/// overall counter is subject to concurrent advances.
pub trait ProgressTracker: Send + Sync {
    fn add_task(&self, description: &str) -> TaskId;
    fn update(&self, task: TaskId, update: ProgressUpdate);
    fn remove_task(&self, task: TaskId);
    fn advance_overall(&self, amount: f64);
}

pub type SharedProgress = Arc<dyn ProgressTracker>;

/// Tracker that discards everything. Default for headless runs.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressTracker for NoopProgress {
    fn add_task(&self, _description: &str) -> TaskId {
        TaskId(0)
    }
    fn update(&self, _task: TaskId, _update: ProgressUpdate) {}
    fn remove_task(&self, _task: TaskId) {}
    fn advance_overall(&self, _amount: f64) {}
}
