use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "appraise",
    version,
    about = "appraise: concurrent evaluation harness for AI features"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an evaluation suite
    Run(RunArgs),
    /// Show or update default settings
    Config(ConfigArgs),
    /// List registered harnesses
    List,
}

impl Command {
    /// The `--config` override of the subcommand, if it carries one.
    pub fn config_override(&self) -> Option<&Path> {
        match self {
            Command::Run(args) => args.config.as_deref(),
            Command::Config(args) => args.config.as_deref(),
            Command::List => None,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Suite file: a YAML list of test cases
    #[arg(long, short = 's')]
    pub suite: PathBuf,

    /// Harness to evaluate with (see `appraise list`)
    #[arg(long, default_value = "echo")]
    pub harness: String,

    /// Directory holding expected-output resource files (default: the suite
    /// file's directory)
    #[arg(long)]
    pub resources_dir: Option<PathBuf>,

    /// Repeat the whole suite this many times; the summary aggregates across
    /// repetitions
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Settings file override
    #[arg(long, env = "APPRAISE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Default destination directory for result CSV files
    #[arg(long, short = 'd')]
    pub dst_dir: Option<PathBuf>,

    /// Base name for report files
    #[arg(long)]
    pub report_name: Option<String>,

    /// Enable or disable the default CSV report generation
    #[arg(long = "enable-csv", overrides_with = "disable_csv")]
    pub enable_csv: bool,
    #[arg(long = "disable-csv", overrides_with = "enable_csv")]
    pub disable_csv: bool,

    /// Default log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Settings file override
    #[arg(long, env = "APPRAISE_CONFIG")]
    pub config: Option<PathBuf>,
}
