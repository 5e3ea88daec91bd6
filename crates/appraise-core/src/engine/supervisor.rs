//! Fan-out of case pipelines, failure isolation, row collection and the
//! run-level strict-failure verdict.

use crate::engine::pipeline::{self, CaseOutcome};
use crate::errors::{CaseError, CaseErrorKind, SuiteError};
use crate::harness::Harness;
use crate::model::{ScoredRow, TestCase};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::task::JoinSet;

/// Runs every test case of a suite concurrently and decides the run's
/// overall outcome. Rows accumulate in pipeline completion order; strict
/// failures are collected (not raised immediately) so every case still gets
/// a chance to run before the run reports failure.
pub struct Supervisor {
    harness: Harness,
    rows: Mutex<Vec<ScoredRow>>,
}

impl Supervisor {
    pub fn new(harness: Harness) -> Self {
        Self {
            harness,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Run all cases to a terminal state. Returns `Err` iff at least one
    /// strict-mode case failed; the error enumerates every strict failure in
    /// completion order. Non-strict failures only shrink the row set.
    pub async fn run_suite(&self, test_cases: &[TestCase]) -> Result<(), SuiteError> {
        let mut join_set: JoinSet<CaseOutcome> = JoinSet::new();
        // Task id -> (case id, strict flag), so a panicked pipeline can still
        // be attributed to its case at the join point.
        let mut spawned: HashMap<tokio::task::Id, (u32, bool)> = HashMap::new();

        for tc in test_cases {
            let harness = self.harness.clone();
            let tc = tc.clone();
            let strict = tc.config.strict_mode;
            let id = tc.id;
            let handle = join_set.spawn(pipeline::run_case(harness, tc));
            spawned.insert(handle.id(), (id, strict));
        }

        let mut strict_failures: Vec<CaseError> = Vec::new();
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok(CaseOutcome::Completed(row)) => {
                    self.rows.lock().expect("row collection lock").push(row);
                }
                Ok(CaseOutcome::Swallowed) => {}
                Ok(CaseOutcome::Strict(err)) => strict_failures.push(err),
                Err(join_err) => {
                    // Executor panics are caught inside the pipeline; this
                    // branch is reached only if a task is aborted or the
                    // unwind escapes some other way. The pipeline's cleanup
                    // never ran, so keep the overall counter consistent.
                    let (case, strict) = spawned
                        .get(&join_err.id())
                        .copied()
                        .unwrap_or((0, false));
                    let err = CaseError::new(case, CaseErrorKind::Panicked(join_err.to_string()));
                    self.harness.progress.advance_overall(1.0);
                    if strict {
                        strict_failures.push(err);
                    } else {
                        tracing::error!(case, error = %err, "pipeline task lost (non-strict); dropping");
                    }
                }
            }
        }

        if strict_failures.is_empty() {
            Ok(())
        } else {
            Err(SuiteError::Strict {
                failures: strict_failures,
            })
        }
    }

    /// Snapshot of the accumulated rows, in pipeline completion order.
    pub fn rows(&self) -> Vec<ScoredRow> {
        self.rows.lock().expect("row collection lock").clone()
    }

    /// Forward the identifier-sorted rows plus the run index to every
    /// registered publisher. Publisher failures are logged, never escalated;
    /// retrying is the publisher's own failure boundary.
    pub async fn publish_results(&self, run_index: usize) {
        let mut rows = self.rows();
        rows.sort_by_key(|r| r.identifier);
        tracing::debug!(run_index, rows = rows.len(), "publishing results");
        for publisher in &self.harness.publishers {
            if let Err(e) = publisher.publish(&rows, run_index).await {
                tracing::warn!(publisher = publisher.name(), error = %e, "result publisher failed");
            }
        }
    }
}
