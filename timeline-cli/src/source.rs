//! Filesystem-backed inputs: detail documents, the timeline index and known ids.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use timeline_ingest::{Reader, TIMELINE_DETAIL, TimelineEntry};

/// Serves previously downloaded detail documents as `<dir>/<id>.json`
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    dir: PathBuf,
}

impl DirectoryReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Reader for DirectoryReader {
    fn read(&self, document_type: &str, params: &Map<String, Value>) -> Result<Vec<u8>> {
        if document_type != TIMELINE_DETAIL {
            bail!("unsupported document type '{}'", document_type);
        }
        let id = params
            .get("id")
            .and_then(Value::as_str)
            .context("missing 'id' parameter")?;
        if id.is_empty() || id.contains(['/', '\\']) || id == ".." {
            bail!("invalid document id '{}'", id);
        }

        let path = self.dir.join(format!("{id}.json"));
        fs::read(&path).with_context(|| format!("read {}", path.display()))
    }
}

pub fn load_timeline(path: &Path) -> Result<Vec<TimelineEntry>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// One id per line; blank lines and `#` comments are ignored.
pub fn load_known_ids(path: &Path) -> Result<HashSet<String>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let ids: HashSet<String> = s
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    log::debug!("{} known ids in {}", ids.len(), path.display());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(id: &str) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("id".to_string(), Value::String(id.to_string()));
        m
    }

    #[test]
    fn test_directory_reader() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tx-1.json"), br#"{"id":"tx-1","sections":[]}"#).unwrap();
        let reader = DirectoryReader::new(dir.path());

        let bytes = reader.read(TIMELINE_DETAIL, &params("tx-1")).unwrap();
        assert!(bytes.starts_with(b"{\"id\""));

        assert!(reader.read(TIMELINE_DETAIL, &params("tx-2")).is_err());
        assert!(reader.read(TIMELINE_DETAIL, &params("../tx-1")).is_err());
        assert!(reader.read("timelineTransactions", &params("tx-1")).is_err());
    }

    #[test]
    fn test_load_timeline_and_known_ids() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = dir.path().join("timeline.json");
        fs::write(
            &timeline,
            r#"[{"id": "a", "eventType": "PAYMENT_INBOUND"}, {"id": "b", "eventType": "ORDER_EXECUTED"}]"#,
        )
        .unwrap();
        let entries = load_timeline(&timeline).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].event_type, "ORDER_EXECUTED");

        let known = dir.path().join("known.txt");
        fs::write(&known, "# exported 2024-03\na\n\n  b  \n").unwrap();
        let ids = load_known_ids(&known).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("b"));
    }
}
