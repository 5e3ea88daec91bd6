use crate::cli::args::RunArgs;
use crate::cli::exit_codes;
use crate::{console, harness, progress::IndicatifProgress, suite};
use appraise_core::config::AppConfig;
use appraise_core::engine::Supervisor;
use appraise_core::progress::{NoopProgress, SharedProgress};
use appraise_core::report::summary::ReportSummary;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let cases = suite::load_suite(&args.suite)?;

    if args.runs == 0 {
        anyhow::bail!("--runs must be at least 1");
    }

    let resources_dir = match &args.resources_dir {
        Some(dir) => dir.clone(),
        None => args
            .suite
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let total = (cases.len() * args.runs) as u64;
    let bars = if args.no_progress {
        None
    } else {
        Some(Arc::new(IndicatifProgress::new(total)))
    };
    let progress: SharedProgress = match &bars {
        Some(b) => b.clone(),
        None => Arc::new(NoopProgress),
    };

    let harness = harness::build(&args.harness, resources_dir, &config)?.with_progress(progress);
    tracing::info!(
        suite = %args.suite.display(),
        cases = cases.len(),
        runs = args.runs,
        harness = args.harness,
        "starting evaluation"
    );

    let mut all_runs_rows = Vec::with_capacity(args.runs);
    for run_index in 0..args.runs {
        let supervisor = Supervisor::new(harness.clone());
        if let Err(e) = supervisor.run_suite(&cases).await {
            if let Some(b) = &bars {
                b.finish();
            }
            eprintln!("{e}");
            return Ok(exit_codes::TEST_FAILURE);
        }
        supervisor.publish_results(run_index).await;
        all_runs_rows.push(supervisor.rows());
    }
    if let Some(b) = &bars {
        b.finish();
    }

    match ReportSummary::new(all_runs_rows).aggregate() {
        Some(report) => console::print_summary(&report),
        None => eprintln!("No test case produced a score."),
    }
    Ok(exit_codes::OK)
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load(p),
        None => match AppConfig::default_path() {
            Some(p) => AppConfig::load(&p),
            None => Ok(AppConfig::default()),
        },
    }
}
