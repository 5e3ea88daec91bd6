use clap::Parser;
use std::path::Path;

mod cli;
mod console;
mod harness;
mod progress;
mod suite;

use appraise_core::config::AppConfig;
use cli::args::Cli;
use cli::commands::dispatch;
use cli::exit_codes;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.cmd.config_override());
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

/// `RUST_LOG` wins; otherwise the persisted `log_level` drives the filter.
fn init_logging(config_path: Option<&Path>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(configured_level(config_path)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Best effort at startup: a missing or malformed settings file falls back
/// to the default level here and is surfaced by the command itself.
fn configured_level(config_path: Option<&Path>) -> String {
    let loaded = match config_path {
        Some(p) => AppConfig::load(p),
        None => match AppConfig::default_path() {
            Some(p) => AppConfig::load(&p),
            None => Ok(AppConfig::default()),
        },
    };
    loaded.unwrap_or_default().log_level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_reads_the_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let cfg = AppConfig {
            log_level: "debug".into(),
            ..AppConfig::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(configured_level(Some(&path)), "debug");
    }

    #[test]
    fn configured_level_defaults_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert_eq!(configured_level(Some(&path)), "info");
    }
}
