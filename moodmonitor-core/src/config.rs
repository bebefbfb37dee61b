//! Configuration management
//!
//! settings.json in the data directory:
//! ```json
//! {
//!   "demoMode": false,
//!   "syncEndpoint": "https://moods.example.com/api"
//! }
//! ```
//! Keys this crate doesn't know about are kept as-is on save.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";
pub const ENV_DEMO_MODE: &str = "MOODMONITOR_DEMO_MODE";
pub const ENV_SYNC_ENDPOINT: &str = "MOODMONITOR_SYNC_ENDPOINT";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sync_endpoint: Option<String>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub demo_mode: bool,
    /// Base URL of the remote mood platform; no remote sync when unset
    pub sync_endpoint: Option<String>,
}

impl Config {
    /// Load settings.json from the data directory, then apply the
    /// environment overrides (`MOODMONITOR_DEMO_MODE`, `MOODMONITOR_SYNC_ENDPOINT`)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        Ok(Self::from_sources(
            raw,
            std::env::var(ENV_DEMO_MODE).ok().as_deref(),
            std::env::var(ENV_SYNC_ENDPOINT).ok(),
        ))
    }

    fn from_sources(
        raw: SettingsFile,
        demo_env: Option<&str>,
        endpoint_env: Option<String>,
    ) -> Self {
        let demo_mode = demo_env.and_then(parse_flag).unwrap_or(raw.demo_mode);
        let sync_endpoint = endpoint_env
            .or(raw.sync_endpoint)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Self {
            demo_mode,
            sync_endpoint,
        }
    }

    /// Write the managed fields back, preserving everything else in the file
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.demo_mode = self.demo_mode;
        settings.sync_endpoint = self.sync_endpoint.clone();

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// State database file name for the current mode
    pub fn db_filename(&self) -> &'static str {
        if self.demo_mode {
            "demo.duckdb"
        } else {
            "moodmonitor.duckdb"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_sources(raw, None, None);
        assert_eq!(config, Config::default());
        assert_eq!(config.db_filename(), "moodmonitor.duckdb");
    }

    #[test]
    fn test_env_overrides_file() {
        let raw: SettingsFile =
            serde_json::from_str(r#"{"demoMode": true, "syncEndpoint": "https://a.example"}"#)
                .unwrap();
        let config = Config::from_sources(raw, Some("0"), Some("https://b.example".into()));
        assert!(!config.demo_mode);
        assert_eq!(config.sync_endpoint.as_deref(), Some("https://b.example"));
    }

    #[test]
    fn test_unparseable_flag_falls_back_to_file() {
        let raw: SettingsFile = serde_json::from_str(r#"{"demoMode": true}"#).unwrap();
        let config = Config::from_sources(raw, Some("maybe"), Some("  ".into()));
        assert!(config.demo_mode);
        assert_eq!(config.sync_endpoint, None);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"demoMode": false, "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::from_sources(read_settings(dir.path()).unwrap(), None, None);
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["demoMode"], true);
        assert_eq!(value["theme"], "dark");
        assert_eq!(config.db_filename(), "demo.duckdb");
    }
}
