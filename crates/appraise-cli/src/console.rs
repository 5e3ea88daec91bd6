//! Console rendering for the cross-run summary.

use appraise_core::model::ScoreBand;
use appraise_core::report::summary::SummaryReport;

fn band_icon(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "✅",
        ScoreBand::Warn => "⚠️ ",
        ScoreBand::Bad => "❌",
    }
}

pub(crate) fn print_summary(report: &SummaryReport) {
    eprintln!("\nTest Summary");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if report.multi_run {
        eprintln!(
            "{:<4} {:>10} {:>8} {:>8} {:>6}",
            "ID", "Avg Score", "Min", "Max", "Runs"
        );
        for case in &report.cases {
            eprintln!(
                "{} {:<4} {:>8.2} {:>8.2} {:>8.2} {:>6}",
                band_icon(case.band),
                case.identifier,
                case.average,
                case.min,
                case.max,
                case.samples
            );
        }
    } else {
        eprintln!("{:<4} {:>10}", "ID", "Avg Score");
        for case in &report.cases {
            eprintln!(
                "{} {:<4} {:>8.2}",
                band_icon(case.band),
                case.identifier,
                case.average
            );
        }
    }
    eprintln!(
        "\n{} Overall Average Score: {:.2}",
        band_icon(report.overall.band),
        report.overall.average
    );
}
