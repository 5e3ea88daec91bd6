//! Built-in harness registry: a typed set of capability bundles resolved once
//! at startup. External harnesses plug in by implementing the appraise-core
//! traits and adding an entry here.

use appraise_core::config::AppConfig;
use appraise_core::harness::{
    FeatureExecutor, Harness, JudgedChecker, ResultPublisher, RowBuilder, StaticChecker,
};
use appraise_core::model::{CheckResult, FeatureOutput, ScoreRange, ScoredRow, TestCase};
use appraise_core::report::csv::CsvPublisher;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) struct HarnessEntry {
    pub name: &'static str,
    pub description: &'static str,
}

pub(crate) fn registered_harnesses() -> Vec<HarnessEntry> {
    vec![HarnessEntry {
        name: "echo",
        description: "dry-run harness: echoes the input, checks expected-output substrings",
    }]
}

/// Resolve a harness by name and wire the configured publishers.
pub(crate) fn build(
    name: &str,
    resources_dir: PathBuf,
    config: &AppConfig,
) -> anyhow::Result<Harness> {
    let mut harness = match name {
        "echo" => Harness::new(
            Arc::new(EchoFeature),
            Arc::new(ContainsChecker { resources_dir }),
            Arc::new(DisabledJudge),
            Arc::new(WeightedRowBuilder),
        ),
        other => anyhow::bail!(
            "unknown harness: {other} (run `appraise list` for registered harnesses)"
        ),
    };
    if config.enable_csv {
        let csv: Arc<dyn ResultPublisher> = Arc::new(CsvPublisher::from_config(config));
        harness = harness.with_publisher(csv);
    }
    Ok(harness)
}

/// Feature stage that returns the test-case input payload unchanged. Useful
/// for exercising a suite end-to-end before a real feature executor exists.
struct EchoFeature;

#[async_trait]
impl FeatureExecutor for EchoFeature {
    async fn run(&self, test_case: &TestCase) -> anyhow::Result<FeatureOutput> {
        Ok(FeatureOutput::new(test_case.input.clone()))
    }
}

/// Programmatic check: every non-empty line of the expected output must
/// appear as a substring of the feature output's text form. Score is the
/// found fraction on a 0..10 scale.
struct ContainsChecker {
    resources_dir: PathBuf,
}

impl StaticChecker for ContainsChecker {
    fn run(&self, test_case: &TestCase, output: &FeatureOutput) -> anyhow::Result<CheckResult> {
        let Some(expected) = &test_case.expected_output else {
            return Ok(CheckResult {
                passed: Some(true),
                score: None,
                reasoning: "no expected output declared".into(),
                details: serde_json::Value::Null,
            });
        };
        let expected_text = expected.resolve(&self.resources_dir)?;
        let haystack = output.as_text();

        let needles: Vec<&str> = expected_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if needles.is_empty() {
            return Ok(CheckResult::pass(10.0, "expected output empty"));
        }

        let missing: Vec<&str> = needles
            .iter()
            .copied()
            .filter(|n| !haystack.contains(n))
            .collect();
        let found = needles.len() - missing.len();
        let score = 10.0 * found as f64 / needles.len() as f64;
        if missing.is_empty() {
            Ok(CheckResult::pass(score, format!("all {found} expected lines present")))
        } else {
            Ok(CheckResult::fail(
                score,
                format!("missing expected lines: {}", missing.join("; ")),
            ))
        }
    }
}

/// Placeholder judged checker: contributes no score, so runs work without
/// LLM credentials. A real judge implements [`JudgedChecker`] and replaces
/// this in the registry.
struct DisabledJudge;

#[async_trait]
impl JudgedChecker for DisabledJudge {
    async fn run(&self, _test_case: &TestCase, _output: &FeatureOutput) -> anyhow::Result<CheckResult> {
        Ok(CheckResult {
            passed: None,
            score: None,
            reasoning: "judged checks disabled".into(),
            details: serde_json::Value::Null,
        })
    }
}

/// Final score = mean of the check scores that exist, on a [0, 10] range.
/// Check reasoning lands in the report columns.
struct WeightedRowBuilder;

impl RowBuilder for WeightedRowBuilder {
    fn build(
        &self,
        test_case: &TestCase,
        _output: &FeatureOutput,
        static_result: &CheckResult,
        judged_result: &CheckResult,
    ) -> ScoredRow {
        let scores: Vec<f64> = [static_result.score, judged_result.score]
            .into_iter()
            .flatten()
            .collect();
        let final_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        let mut columns = serde_json::Map::new();
        columns.insert("Name".into(), serde_json::Value::String(test_case.name.clone()));
        columns.insert(
            "Static Reasoning".into(),
            serde_json::Value::String(static_result.reasoning.clone()),
        );
        columns.insert(
            "Judged Reasoning".into(),
            serde_json::Value::String(judged_result.reasoning.clone()),
        );

        ScoredRow {
            identifier: test_case.id,
            final_score,
            score_range: ScoreRange::new(0.0, 10.0),
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appraise_core::model::{ExpectedOutput, TestCaseConfig};

    fn case_with_expected(input: &str, expected: &str) -> TestCase {
        TestCase {
            id: 1,
            name: "contains".into(),
            description: String::new(),
            input: serde_json::Value::String(input.to_string()),
            config: TestCaseConfig::default(),
            tags: vec![],
            expected_output: Some(ExpectedOutput {
                file_name: None,
                content: expected.to_string(),
            }),
        }
    }

    #[test]
    fn contains_checker_scores_found_fraction() {
        let checker = ContainsChecker {
            resources_dir: PathBuf::from("."),
        };
        let tc = case_with_expected("SELECT id FROM users WHERE age > 21", "SELECT\nDELETE");
        let output = FeatureOutput::new(tc.input.clone());
        let result = checker.run(&tc, &output).unwrap();
        assert_eq!(result.passed, Some(false));
        assert_eq!(result.score, Some(5.0));
        assert!(result.reasoning.contains("DELETE"));
    }

    #[test]
    fn contains_checker_passes_without_expected_output() {
        let checker = ContainsChecker {
            resources_dir: PathBuf::from("."),
        };
        let mut tc = case_with_expected("anything", "");
        tc.expected_output = None;
        let output = FeatureOutput::new(tc.input.clone());
        let result = checker.run(&tc, &output).unwrap();
        assert_eq!(result.passed, Some(true));
        assert_eq!(result.score, None);
    }

    #[test]
    fn row_builder_ignores_scoreless_checks() {
        let tc = case_with_expected("x", "x");
        let output = FeatureOutput::new(tc.input.clone());
        let static_result = CheckResult::pass(8.0, "static");
        let judged_result = CheckResult {
            passed: None,
            score: None,
            reasoning: "judged checks disabled".into(),
            details: serde_json::Value::Null,
        };
        let row = WeightedRowBuilder.build(&tc, &output, &static_result, &judged_result);
        assert_eq!(row.final_score, 8.0, "disabled judge must not dilute the score");
        assert_eq!(row.columns["Judged Reasoning"], "judged checks disabled");
    }

    #[test]
    fn unknown_harness_is_an_error() {
        let err = build("nope", PathBuf::from("."), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unknown harness"));
    }
}
