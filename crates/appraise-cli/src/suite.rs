//! Suite loading: a YAML list of test cases. Duplicate-id detection happens
//! here at the harness boundary; the engine itself does not validate.

use appraise_core::model::TestCase;
use std::collections::HashSet;
use std::path::Path;

pub(crate) fn load_suite(path: &Path) -> anyhow::Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("suite file {}: {}", path.display(), e))?;
    let cases: Vec<TestCase> = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("suite file {}: {}", path.display(), e))?;

    if cases.is_empty() {
        anyhow::bail!("suite file {} contains no test cases", path.display());
    }
    let mut seen = HashSet::new();
    let duplicates: Vec<u32> = cases
        .iter()
        .map(|tc| tc.id)
        .filter(|id| !seen.insert(*id))
        .collect();
    if !duplicates.is_empty() {
        anyhow::bail!(
            "suite file {} has duplicate test case ids: {:?}",
            path.display(),
            duplicates
        );
    }
    if let Some(bad) = cases.iter().find(|tc| tc.id == 0) {
        anyhow::bail!("test case '{}' has id 0; ids must be positive", bad.name);
    }
    if let Some(bad) = cases.iter().find(|tc| tc.config.timeout_seconds == 0) {
        anyhow::bail!(
            "test case '{}' has timeout_seconds 0; the deadline must be positive",
            bad.name
        );
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_minimal_suite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        std::fs::write(
            &path,
            r#"
- id: 1
  name: first
  input: "hello"
- id: 2
  name: second
  input: { prompt: "world" }
  config:
    timeout_seconds: 5
    strict_mode: true
  tags: [smoke]
"#,
        )
        .unwrap();
        let cases = load_suite(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert!(cases[1].config.strict_mode);
        assert_eq!(cases[1].config.timeout_seconds, 5);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        std::fs::write(
            &path,
            "- { id: 1, name: a, input: x }\n- { id: 1, name: b, input: y }\n",
        )
        .unwrap();
        let err = load_suite(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        std::fs::write(
            &path,
            "- { id: 1, name: a, input: x, config: { timeout_seconds: 0 } }\n",
        )
        .unwrap();
        let err = load_suite(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn rejects_empty_suite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.yaml");
        std::fs::write(&path, "[]\n").unwrap();
        assert!(load_suite(&path).unwrap_err().to_string().contains("no test cases"));
    }
}
