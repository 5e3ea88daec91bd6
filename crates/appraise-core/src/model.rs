//! Data model for evaluation suites: test cases, stage payloads, scored rows.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One unit of evaluation work: identity, input payload, per-case policy.
/// Immutable once loaded; the caller owns it for the duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Positive, unique within a run. The report summary groups strictly by this.
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque to the engine; handed to the feature executor as-is.
    pub input: serde_json::Value,
    #[serde(default)]
    pub config: TestCaseConfig,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub expected_output: Option<ExpectedOutput>,
}

/// Per-case execution policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseConfig {
    /// Wall-clock budget for the whole pipeline (feature + checks + finalize).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// When set, a failure or timeout on this case fails the whole run.
    #[serde(default)]
    pub strict_mode: bool,
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for TestCaseConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            strict_mode: false,
        }
    }
}

/// Expected-output descriptor: inline content, or a file resolved against the
/// suite's resources directory. Inline content wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedOutput {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl ExpectedOutput {
    pub fn resolve(&self, resources_dir: &Path) -> anyhow::Result<String> {
        if !self.content.is_empty() {
            return Ok(self.content.clone());
        }
        let Some(name) = &self.file_name else {
            return Ok(String::new());
        };
        let path = resources_dir.join(name);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("expected output file {}: {}", path.display(), e))?;
        Ok(content)
    }
}

/// Payload produced by the feature under test. Opaque to the engine beyond
/// being passed to the checkers and the row builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureOutput {
    pub payload: serde_json::Value,
}

impl FeatureOutput {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }

    /// Best-effort text view of the payload, for checkers that work on text.
    pub fn as_text(&self) -> String {
        match &self.payload {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Result of one check stage (static or judged): a pass/fail or numeric
/// signal plus reasoning text. Opaque beyond the row-builder contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl CheckResult {
    pub fn pass(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            passed: Some(true),
            score: Some(score),
            reasoning: reasoning.into(),
            details: serde_json::Value::Null,
        }
    }

    pub fn fail(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            passed: Some(false),
            score: Some(score),
            reasoning: reasoning.into(),
            details: serde_json::Value::Null,
        }
    }
}

/// Inclusive score bounds, used only to classify a score into a band; a score
/// outside the range is never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "score range min must not exceed max");
        Self { min, max }
    }

    /// Qualitative band for a score on this range. A degenerate range (span
    /// zero or negative) classifies as Good iff the score reaches max.
    pub fn band(&self, score: f64) -> ScoreBand {
        let span = self.max - self.min;
        if span <= 0.0 {
            return if score >= self.max {
                ScoreBand::Good
            } else {
                ScoreBand::Bad
            };
        }
        let normalized = (score - self.min) / span;
        if normalized >= 0.8 {
            ScoreBand::Good
        } else if normalized >= 0.5 {
            ScoreBand::Warn
        } else {
            ScoreBand::Bad
        }
    }
}

/// Qualitative bucket for rendering (coloring) a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Warn,
    Bad,
}

/// The final, immutable result record for one completed test case. Created
/// exactly once by the row builder; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRow {
    /// Mirrors the test case id.
    pub identifier: u32,
    pub final_score: f64,
    pub score_range: ScoreRange,
    /// Extra report columns (CSV cells), keyed by column header.
    #[serde(default)]
    pub columns: serde_json::Map<String, serde_json::Value>,
}

impl ScoredRow {
    pub fn band(&self) -> ScoreBand {
        self.score_range.band(self.final_score)
    }
}
