//! Error taxonomy for suite execution.
//!
//! Per-case failures are classified ([`CaseError`]) and either swallowed
//! (non-strict) or collected; the run as a whole fails with one
//! [`SuiteError::Strict`] bundling every strict failure, never just the first.

use std::time::Duration;

/// The pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Feature,
    Evaluation,
    Finalize,
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageName::Feature => write!(f, "feature"),
            StageName::Evaluation => write!(f, "evaluation"),
            StageName::Finalize => write!(f, "finalize"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaseErrorKind {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: StageName,
        #[source]
        source: anyhow::Error,
    },
    #[error("deadline of {:.1}s elapsed", .budget.as_secs_f64())]
    Timeout { budget: Duration },
    /// The pipeline task itself died (panic inside an executor).
    #[error("pipeline task panicked: {0}")]
    Panicked(String),
}

/// A classified failure for one test case.
#[derive(Debug, thiserror::Error)]
#[error("test case {case}: {kind}")]
pub struct CaseError {
    pub case: u32,
    #[source]
    pub kind: CaseErrorKind,
}

impl CaseError {
    pub fn new(case: u32, kind: CaseErrorKind) -> Self {
        Self { case, kind }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, CaseErrorKind::Timeout { .. })
    }
}

/// Run-level failure: every strict-mode case failure collected during the
/// run, in pipeline completion order.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("{}", format_strict(.failures))]
    Strict { failures: Vec<CaseError> },
}

impl SuiteError {
    pub fn failures(&self) -> &[CaseError] {
        match self {
            SuiteError::Strict { failures } => failures,
        }
    }
}

fn format_strict(failures: &[CaseError]) -> String {
    let mut out = format!("strict mode: {} test case(s) failed", failures.len());
    for f in failures {
        out.push_str("\n  - ");
        out.push_str(&f.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_error_enumerates_every_failure() {
        let err = SuiteError::Strict {
            failures: vec![
                CaseError::new(
                    3,
                    CaseErrorKind::Timeout {
                        budget: Duration::from_secs(5),
                    },
                ),
                CaseError::new(
                    7,
                    CaseErrorKind::Stage {
                        stage: StageName::Feature,
                        source: anyhow::anyhow!("provider unreachable"),
                    },
                ),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 test case(s) failed"), "{msg}");
        assert!(msg.contains("test case 3"), "{msg}");
        assert!(msg.contains("test case 7"), "{msg}");
        assert!(msg.contains("provider unreachable"), "{msg}");
    }

    #[test]
    fn timeout_classification() {
        let err = CaseError::new(
            1,
            CaseErrorKind::Timeout {
                budget: Duration::from_secs(30),
            },
        );
        assert!(err.is_timeout());
        assert!(err.to_string().contains("30.0s"));
    }
}
