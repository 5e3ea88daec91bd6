//! Capability contracts for the stages of a case pipeline, and the [`Harness`]
//! bundle that injects them into the supervisor.
//!
//! These seams replace the original runtime plugin discovery: a harness is a
//! typed registry resolved once at startup and passed down explicitly.

use crate::model::{CheckResult, FeatureOutput, ScoredRow, TestCase};
use crate::progress::SharedProgress;
use async_trait::async_trait;
use std::sync::Arc;

/// The feature under test: an opaque async operation from test-case input to
/// output. I/O-bound; runs on the cooperative scheduler.
#[async_trait]
pub trait FeatureExecutor: Send + Sync {
    async fn run(&self, test_case: &TestCase) -> anyhow::Result<FeatureOutput>;
}

/// Programmatic checks over the feature output. CPU-bound and synchronous;
/// the pipeline moves it onto the blocking pool so it cannot starve the
/// scheduler loop.
pub trait StaticChecker: Send + Sync {
    fn run(&self, test_case: &TestCase, output: &FeatureOutput) -> anyhow::Result<CheckResult>;
}

/// Judged (LLM-backed) checks over the feature output. I/O-bound.
#[async_trait]
pub trait JudgedChecker: Send + Sync {
    async fn run(&self, test_case: &TestCase, output: &FeatureOutput)
        -> anyhow::Result<CheckResult>;
}

/// Pure builder of the final row from both check results.
pub trait RowBuilder: Send + Sync {
    fn build(
        &self,
        test_case: &TestCase,
        output: &FeatureOutput,
        static_result: &CheckResult,
        judged_result: &CheckResult,
    ) -> ScoredRow;
}

/// Receiver for one run's identifier-sorted rows. Zero or more publishers are
/// registered per harness; publish failures are logged and never fail a run.
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    fn name(&self) -> &str;
    async fn publish(&self, rows: &[ScoredRow], run_index: usize) -> anyhow::Result<()>;
}

/// The full capability set for a run, constructed once per process invocation
/// and passed down. No implicit process-wide state.
#[derive(Clone)]
pub struct Harness {
    pub feature: Arc<dyn FeatureExecutor>,
    pub static_checker: Arc<dyn StaticChecker>,
    pub judged_checker: Arc<dyn JudgedChecker>,
    pub row_builder: Arc<dyn RowBuilder>,
    pub publishers: Vec<Arc<dyn ResultPublisher>>,
    pub progress: SharedProgress,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("publishers", &self.publishers.len())
            .finish_non_exhaustive()
    }
}

impl Harness {
    pub fn new(
        feature: Arc<dyn FeatureExecutor>,
        static_checker: Arc<dyn StaticChecker>,
        judged_checker: Arc<dyn JudgedChecker>,
        row_builder: Arc<dyn RowBuilder>,
    ) -> Self {
        Self {
            feature,
            static_checker,
            judged_checker,
            row_builder,
            publishers: Vec::new(),
            progress: Arc::new(crate::progress::NoopProgress),
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn ResultPublisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    pub fn with_progress(mut self, progress: SharedProgress) -> Self {
        self.progress = progress;
        self
    }
}
