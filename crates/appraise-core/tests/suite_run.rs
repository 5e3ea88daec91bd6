//! End-to-end: supervisor over a scripted harness, CSV publishing across
//! repeated runs, and cross-run summary aggregation.

use appraise_core::engine::Supervisor;
use appraise_core::harness::{
    FeatureExecutor, Harness, JudgedChecker, ResultPublisher, RowBuilder, StaticChecker,
};
use appraise_core::model::{
    CheckResult, FeatureOutput, ScoreRange, ScoredRow, TestCase, TestCaseConfig,
};
use appraise_core::report::csv::CsvPublisher;
use appraise_core::report::summary::ReportSummary;
use async_trait::async_trait;
use std::sync::Arc;

struct EchoFeature;

#[async_trait]
impl FeatureExecutor for EchoFeature {
    async fn run(&self, tc: &TestCase) -> anyhow::Result<FeatureOutput> {
        Ok(FeatureOutput::new(tc.input.clone()))
    }
}

/// Scores by input length so different cases get different, deterministic
/// scores.
struct LengthChecker;

impl StaticChecker for LengthChecker {
    fn run(&self, _tc: &TestCase, output: &FeatureOutput) -> anyhow::Result<CheckResult> {
        let len = output.as_text().len() as f64;
        Ok(CheckResult::pass(len.min(10.0), "length check"))
    }
}

struct FixedJudge(f64);

#[async_trait]
impl JudgedChecker for FixedJudge {
    async fn run(&self, _tc: &TestCase, _output: &FeatureOutput) -> anyhow::Result<CheckResult> {
        Ok(CheckResult::pass(self.0, "fixed verdict"))
    }
}

struct MeanBuilder;

impl RowBuilder for MeanBuilder {
    fn build(
        &self,
        tc: &TestCase,
        _output: &FeatureOutput,
        static_result: &CheckResult,
        judged_result: &CheckResult,
    ) -> ScoredRow {
        let mut columns = serde_json::Map::new();
        columns.insert(
            "Static Reasoning".into(),
            serde_json::Value::String(static_result.reasoning.clone()),
        );
        columns.insert(
            "Judged Reasoning".into(),
            serde_json::Value::String(judged_result.reasoning.clone()),
        );
        ScoredRow {
            identifier: tc.id,
            final_score: (static_result.score.unwrap() + judged_result.score.unwrap()) / 2.0,
            score_range: ScoreRange::new(0.0, 10.0),
            columns,
        }
    }
}

fn case(id: u32, input: &str) -> TestCase {
    TestCase {
        id,
        name: format!("case-{id}"),
        description: String::new(),
        input: serde_json::Value::String(input.to_string()),
        config: TestCaseConfig::default(),
        tags: vec![],
        expected_output: None,
    }
}

fn harness(publishers: Vec<Arc<dyn ResultPublisher>>) -> Harness {
    let mut h = Harness::new(
        Arc::new(EchoFeature),
        Arc::new(LengthChecker),
        Arc::new(FixedJudge(6.0)),
        Arc::new(MeanBuilder),
    );
    for p in publishers {
        h = h.with_publisher(p);
    }
    h
}

#[tokio::test]
async fn repeated_runs_publish_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let config = appraise_core::config::AppConfig {
        dst_dir: Some(dir.path().to_path_buf()),
        report_name: "report".into(),
        ..Default::default()
    };
    let csv: Arc<dyn ResultPublisher> = Arc::new(CsvPublisher::from_config(&config));

    let cases = vec![case(2, "abcd"), case(1, "abcdefgh")];
    let mut all_runs_rows = Vec::new();
    for run_index in 0..2 {
        let sup = Supervisor::new(harness(vec![csv.clone()]));
        sup.run_suite(&cases).await.expect("clean run");
        sup.publish_results(run_index).await;
        let mut rows = sup.rows();
        rows.sort_by_key(|r| r.identifier);
        all_runs_rows.push(rows);
    }

    // One report file per run, first free suffix each time.
    let report_1 = std::fs::read_to_string(dir.path().join("report_1.csv")).unwrap();
    assert!(dir.path().join("report_2.csv").exists());
    let mut lines = report_1.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Test Case ID,Final Score,Judged Reasoning,Static Reasoning"
    );
    // Sorted by identifier: case 1 (len 8 -> (8+6)/2 = 7) before case 2
    // (len 4 -> 5).
    assert!(lines.next().unwrap().starts_with("1,7,"));
    assert!(lines.next().unwrap().starts_with("2,5,"));

    let report = ReportSummary::new(all_runs_rows).aggregate().unwrap();
    assert!(report.multi_run);
    assert_eq!(report.cases[0].identifier, 1);
    assert_eq!(report.cases[0].average, 7.0);
    assert_eq!(report.cases[0].samples, 2);
    assert_eq!(report.cases[1].average, 5.0);
    assert_eq!(report.overall.average, 6.0);
}
