//! Application configuration. Loaded once at startup and passed down
//! explicitly; there is no ambient global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Destination directory for report files. Home directory when unset.
    #[serde(default)]
    pub dst_dir: Option<PathBuf>,
    /// Base name for report files (`{report_name}_{n}.csv`).
    #[serde(default = "default_report_name")]
    pub report_name: String,
    /// Whether the CSV publisher is registered at all.
    #[serde(default = "default_true")]
    pub enable_csv: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_report_name() -> String {
    "report".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dst_dir: None,
            report_name: default_report_name(),
            enable_csv: true,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Default location: `~/.config/appraise/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("appraise").join("config.yaml"))
    }

    /// Load from `path`; missing file yields the defaults, a malformed file
    /// is an error (silent fallback would mask typos).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/config.yaml")).unwrap();
        assert_eq!(cfg.report_name, "report");
        assert!(cfg.enable_csv);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.dst_dir.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "report_name: [not a string").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = AppConfig {
            dst_dir: Some(PathBuf::from("/tmp/reports")),
            report_name: "nightly".into(),
            enable_csv: false,
            log_level: "debug".into(),
        };
        cfg.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.report_name, "nightly");
        assert!(!loaded.enable_csv);
        assert_eq!(loaded.dst_dir.as_deref(), Some(Path::new("/tmp/reports")));
    }
}
