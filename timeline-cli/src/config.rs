use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "timeline.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    /// Timeline index: JSON array of `{id, eventType}`
    pub timeline: PathBuf,
    /// Directory holding `<id>.json` detail documents
    pub details: PathBuf,
    pub csv: PathBuf,
    pub documents_csv: PathBuf,
    /// Optional newline-separated list of ids exported by an earlier run
    pub known_ids: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsSection {
                timeline: PathBuf::from("timeline.json"),
                details: PathBuf::from("details"),
                csv: PathBuf::from("transactions.csv"),
                documents_csv: PathBuf::from("documents.csv"),
                known_ids: None,
            },
            log: LogSection {
                level: "info".to_string(),
            },
        }
    }
}

/// Load the config file, or defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write a default config unless one already exists. Returns true if written.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(path, &Config::default())?;
    Ok(true)
}
