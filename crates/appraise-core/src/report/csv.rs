//! CSV file publisher: one `{report_name}_{n}.csv` per run, written into the
//! configured destination directory (home directory fallback).

use crate::config::AppConfig;
use crate::harness::ResultPublisher;
use crate::model::ScoredRow;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub struct CsvPublisher {
    dst_dir: Option<PathBuf>,
    report_name: String,
}

impl CsvPublisher {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dst_dir: config.dst_dir.clone(),
            report_name: config.report_name.clone(),
        }
    }

    fn report_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.dst_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("no destination directory configured and no home directory found"))?;
        tracing::warn!(
            "no destination directory configured; writing results to the home directory: {}",
            home.display()
        );
        Ok(home)
    }

    /// First `{report_name}_{n}.csv` (n starting at 1) that does not exist yet.
    fn next_report_file(&self, dir: &Path) -> PathBuf {
        let mut count: u32 = 1;
        loop {
            let candidate = dir.join(format!("{}_{}.csv", self.report_name, count));
            if !candidate.exists() {
                return candidate;
            }
            tracing::debug!(file = %candidate.display(), "report file exists, incrementing");
            count += 1;
        }
    }
}

#[async_trait]
impl ResultPublisher for CsvPublisher {
    fn name(&self) -> &str {
        "csv"
    }

    async fn publish(&self, rows: &[ScoredRow], run_index: usize) -> anyhow::Result<()> {
        if rows.is_empty() {
            tracing::warn!(run_index, "no rows to write, skipping report file creation");
            return Ok(());
        }

        let dir = self.report_dir()?;
        std::fs::create_dir_all(&dir)?;
        let file = self.next_report_file(&dir);
        tracing::info!(run_index, file = %file.display(), "writing results");

        std::fs::write(&file, render_csv(rows))?;
        Ok(())
    }
}

/// Header comes from the first row: the fixed identifier/score cells followed
/// by that row's extra columns in their stored order.
fn render_csv(rows: &[ScoredRow]) -> String {
    let mut out = String::new();
    let extra_headers: Vec<&str> = rows[0].columns.keys().map(String::as_str).collect();

    out.push_str("Test Case ID,Final Score");
    for h in &extra_headers {
        out.push(',');
        out.push_str(&escape_field(h));
    }
    out.push_str("\r\n");

    for row in rows {
        let _ = write!(out, "{},{}", row.identifier, row.final_score);
        for h in &extra_headers {
            out.push(',');
            let cell = match row.columns.get(*h) {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            out.push_str(&escape_field(&cell));
        }
        out.push_str("\r\n");
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
