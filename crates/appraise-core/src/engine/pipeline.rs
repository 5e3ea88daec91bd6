//! One test case through its three ordered stages under a single wall-clock
//! deadline, with progress transitions and outcome classification.

use crate::errors::{CaseError, CaseErrorKind, StageName};
use crate::harness::Harness;
use crate::model::{CheckResult, FeatureOutput, ScoredRow, TestCase};
use crate::progress::{ProgressUpdate, TaskId};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::timeout;

/// How long a finished indicator stays visible before removal, so a human
/// watching the display can see the terminal state.
const REMOVE_GRACE: Duration = Duration::from_millis(500);

/// Terminal outcome of one case pipeline, as observed by the supervisor.
#[derive(Debug)]
pub(crate) enum CaseOutcome {
    /// The only outcome that yields a row.
    Completed(ScoredRow),
    /// Non-strict failure or timeout: logged and dropped, run continues.
    Swallowed,
    /// Strict-mode failure or timeout: collected, fails the run at the end.
    Strict(CaseError),
}

/// Drive one test case to a terminal state. Never returns an error: every
/// failure is classified into the outcome so one case cannot abort another.
pub(crate) async fn run_case(harness: Harness, test_case: TestCase) -> CaseOutcome {
    let task = harness.progress.add_task(&format!("Test {}", test_case.id));
    let budget = Duration::from_secs(test_case.config.timeout_seconds);

    // Panics inside an executor are caught here, inside the pipeline, so the
    // indicator removal and the overall counter below run for every case.
    let staged = AssertUnwindSafe(timeout(budget, run_stages(&harness, &test_case, task)))
        .catch_unwind()
        .await;
    let outcome = match staged {
        Ok(Ok(Ok(row))) => {
            harness.progress.update(
                task,
                ProgressUpdate::at(100.0, format!("Test {}: Score {:.2}", test_case.id, row.final_score)),
            );
            CaseOutcome::Completed(row)
        }
        Ok(Ok(Err(kind))) => {
            harness
                .progress
                .update(task, ProgressUpdate::at(100.0, format!("Test {}: Error", test_case.id)));
            classify_failure(&test_case, CaseError::new(test_case.id, kind))
        }
        Ok(Err(_elapsed)) => {
            // In-flight stage invocations are abandoned with the timed-out future.
            harness
                .progress
                .update(task, ProgressUpdate::at(100.0, format!("Test {}: Timeout", test_case.id)));
            classify_failure(
                &test_case,
                CaseError::new(test_case.id, CaseErrorKind::Timeout { budget }),
            )
        }
        Err(payload) => {
            harness
                .progress
                .update(task, ProgressUpdate::at(100.0, format!("Test {}: Panicked", test_case.id)));
            classify_failure(
                &test_case,
                CaseError::new(test_case.id, CaseErrorKind::Panicked(panic_message(payload))),
            )
        }
    };

    tokio::time::sleep(REMOVE_GRACE).await;
    harness.progress.remove_task(task);
    harness.progress.advance_overall(1.0);
    outcome
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Strict/non-strict branching shared by stage failures, timeouts and panics.
pub(crate) fn classify_failure(test_case: &TestCase, err: CaseError) -> CaseOutcome {
    if test_case.config.strict_mode {
        CaseOutcome::Strict(err)
    } else {
        tracing::error!(case = test_case.id, error = %err, "test case failed (non-strict); dropping");
        CaseOutcome::Swallowed
    }
}

/// Feature, then both checks concurrently, then the row builder. Strictly
/// ordered across stages; the two checks have no ordering between them.
async fn run_stages(
    harness: &Harness,
    test_case: &TestCase,
    task: TaskId,
) -> Result<ScoredRow, CaseErrorKind> {
    let output = run_feature_stage(harness, test_case, task).await?;
    let (static_result, judged_result) =
        run_evaluation_stage(harness, test_case, &output, task).await?;
    run_finalize_stage(harness, test_case, &output, &static_result, &judged_result, task)
}

async fn run_feature_stage(
    harness: &Harness,
    test_case: &TestCase,
    task: TaskId,
) -> Result<FeatureOutput, CaseErrorKind> {
    harness.progress.update(
        task,
        ProgressUpdate::at(10.0, format!("Test {}: Running feature...", test_case.id)),
    );
    tracing::debug!(case = test_case.id, "running feature");
    let output = harness
        .feature
        .run(test_case)
        .await
        .map_err(|source| CaseErrorKind::Stage {
            stage: StageName::Feature,
            source,
        })?;
    tracing::debug!(case = test_case.id, "feature produced output");
    Ok(output)
}

/// Both checkers run concurrently and both run to completion before errors
/// are inspected; the static checker goes to the blocking pool so a CPU-heavy
/// check cannot starve the scheduler.
async fn run_evaluation_stage(
    harness: &Harness,
    test_case: &TestCase,
    output: &FeatureOutput,
    task: TaskId,
) -> Result<(CheckResult, CheckResult), CaseErrorKind> {
    harness.progress.update(
        task,
        ProgressUpdate::at(40.0, format!("Test {}: Evaluating...", test_case.id)),
    );

    let static_checker = harness.static_checker.clone();
    let static_case = test_case.clone();
    let static_output = output.clone();
    let static_task =
        tokio::task::spawn_blocking(move || static_checker.run(&static_case, &static_output));
    let judged_fut = harness.judged_checker.run(test_case, output);

    let (static_join, judged_result) = tokio::join!(static_task, judged_fut);

    let stage_err = |source: anyhow::Error| CaseErrorKind::Stage {
        stage: StageName::Evaluation,
        source,
    };
    let static_result = static_join
        .map_err(|e| stage_err(anyhow::anyhow!("static checker worker: {e}")))?
        .map_err(stage_err)?;
    let judged_result = judged_result.map_err(stage_err)?;

    tracing::debug!(case = test_case.id, "evaluation checks completed");
    Ok((static_result, judged_result))
}

fn run_finalize_stage(
    harness: &Harness,
    test_case: &TestCase,
    output: &FeatureOutput,
    static_result: &CheckResult,
    judged_result: &CheckResult,
    task: TaskId,
) -> Result<ScoredRow, CaseErrorKind> {
    harness.progress.update(
        task,
        ProgressUpdate::at(80.0, format!("Test {}: Finalizing...", test_case.id)),
    );
    let row = harness
        .row_builder
        .build(test_case, output, static_result, judged_result);
    tracing::debug!(
        case = test_case.id,
        score = row.final_score,
        "row created"
    );
    Ok(row)
}
