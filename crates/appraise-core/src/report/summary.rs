//! Cross-run aggregation of scored rows into per-case and overall statistics.
//!
//! Pure over its input: aggregating the same row sets twice yields identical
//! output. Rendering lives in the CLI.

use crate::model::{ScoreBand, ScoreRange, ScoredRow};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rendering-ready summary: per-case statistics sorted ascending by
/// identifier, plus one overall average.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub cases: Vec<CaseSummary>,
    pub overall: OverallScore,
    /// True when more than one run contributed rows; min/max/samples are only
    /// meaningful then.
    pub multi_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub identifier: u32,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Number of runs that produced a score for this identifier. Identifiers
    /// missing from some runs simply have fewer samples; no imputation.
    pub samples: usize,
    pub score_range: ScoreRange,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallScore {
    pub average: f64,
    /// Classified against the first-seen identifier's range, as a stand-in
    /// scale. Intended behavior when ranges differ across cases is
    /// unspecified upstream; kept as-is.
    pub band: ScoreBand,
}

/// Aggregates rows from one or more full runs of the same suite.
pub struct ReportSummary {
    all_runs_rows: Vec<Vec<ScoredRow>>,
}

impl ReportSummary {
    pub fn new(all_runs_rows: Vec<Vec<ScoredRow>>) -> Self {
        Self { all_runs_rows }
    }

    /// `None` when no run produced any rows.
    pub fn aggregate(&self) -> Option<SummaryReport> {
        // Grouped by identifier; BTreeMap gives ascending order for free.
        let mut scores: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        // First-seen range per identifier; ranges are assumed constant per
        // identifier across runs and are not re-validated.
        let mut ranges: BTreeMap<u32, ScoreRange> = BTreeMap::new();
        let mut first_range: Option<ScoreRange> = None;

        for run_rows in &self.all_runs_rows {
            for row in run_rows {
                scores.entry(row.identifier).or_default().push(row.final_score);
                ranges.entry(row.identifier).or_insert(row.score_range);
                first_range.get_or_insert(row.score_range);
            }
        }

        if scores.is_empty() {
            return None;
        }

        let multi_run = self.all_runs_rows.len() > 1;
        let cases: Vec<CaseSummary> = scores
            .iter()
            .map(|(&identifier, samples)| {
                let average = samples.iter().sum::<f64>() / samples.len() as f64;
                let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
                let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let score_range = ranges[&identifier];
                CaseSummary {
                    identifier,
                    average,
                    min,
                    max,
                    samples: samples.len(),
                    score_range,
                    band: score_range.band(average),
                }
            })
            .collect();

        let all: Vec<f64> = scores.values().flatten().copied().collect();
        let overall_avg = all.iter().sum::<f64>() / all.len() as f64;
        let overall_range = first_range.expect("non-empty scores imply a range");

        Some(SummaryReport {
            cases,
            overall: OverallScore {
                average: overall_avg,
                band: overall_range.band(overall_avg),
            },
            multi_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(identifier: u32, final_score: f64) -> ScoredRow {
        ScoredRow {
            identifier,
            final_score,
            score_range: ScoreRange::new(0.0, 10.0),
            columns: serde_json::Map::new(),
        }
    }

    #[test]
    fn aggregates_across_runs() {
        let summary = ReportSummary::new(vec![vec![row(1, 5.0)], vec![row(1, 7.0)]]);
        let report = summary.aggregate().unwrap();

        assert!(report.multi_run);
        assert_eq!(report.cases.len(), 1);
        let case = &report.cases[0];
        assert_eq!(case.identifier, 1);
        assert_eq!(case.average, 6.0);
        assert_eq!(case.min, 5.0);
        assert_eq!(case.max, 7.0);
        assert_eq!(case.samples, 2);
        assert_eq!(report.overall.average, 6.0);
        assert_eq!(report.overall.band, ScoreBand::Warn);
    }

    #[test]
    fn missing_identifiers_get_fewer_samples() {
        let summary = ReportSummary::new(vec![
            vec![row(1, 4.0), row(2, 8.0)],
            vec![row(2, 10.0)],
        ]);
        let report = summary.aggregate().unwrap();

        assert_eq!(report.cases[0].samples, 1);
        assert_eq!(report.cases[1].samples, 2);
        assert_eq!(report.cases[1].average, 9.0);
    }

    #[test]
    fn cases_sorted_ascending_by_identifier() {
        let summary = ReportSummary::new(vec![vec![row(9, 1.0), row(2, 2.0), row(5, 3.0)]]);
        let report = summary.aggregate().unwrap();
        let ids: Vec<u32> = report.cases.iter().map(|c| c.identifier).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert!(!report.multi_run);
    }

    #[test]
    fn empty_input_produces_nothing() {
        assert!(ReportSummary::new(vec![]).aggregate().is_none());
        assert!(ReportSummary::new(vec![vec![], vec![]]).aggregate().is_none());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let summary = ReportSummary::new(vec![
            vec![row(1, 5.0), row(2, 9.5)],
            vec![row(1, 7.0)],
        ]);
        let a = serde_json::to_value(summary.aggregate().unwrap()).unwrap();
        let b = serde_json::to_value(summary.aggregate().unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overall_band_uses_first_seen_range() {
        // Case 1 carries a [0, 100] range; case 2 a [0, 10] range. The
        // overall average classifies on case 1's range (first seen).
        let wide = ScoredRow {
            identifier: 1,
            final_score: 9.0,
            score_range: ScoreRange::new(0.0, 100.0),
            columns: serde_json::Map::new(),
        };
        let summary = ReportSummary::new(vec![vec![wide, row(2, 9.0)]]);
        let report = summary.aggregate().unwrap();
        assert_eq!(report.overall.average, 9.0);
        assert_eq!(report.overall.band, ScoreBand::Bad);
    }
}
