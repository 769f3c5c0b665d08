//! Client configuration.
//!
//! Read from `~/.draftdesk/config.toml` (or an explicit `--config` path).
//! Every key is optional; command-line flags and `DRAFTDESK_*` environment
//! variables take precedence over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::app_dir;
use crate::drafting::GenerationParams;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:12000/api/v1";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant API.
    pub backend_url: String,
    /// Bearer token obtained from the web client login.
    pub token: Option<String>,
    /// Model used when `--model` is not given.
    pub model: Option<String>,
    /// HTTP timeout in seconds; generation can be slow.
    pub timeout_secs: u64,
    /// Copy finalized drafts to the system clipboard.
    pub clipboard: bool,
    /// How long `copy` keeps serving the clipboard on X11/Wayland, where the
    /// text disappears once the process exits. 0 hands it over immediately.
    pub clipboard_hold_secs: u64,
    pub generation: GenerationParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            token: None,
            model: None,
            timeout_secs: 60,
            clipboard: true,
            clipboard_hold_secs: 30,
            generation: GenerationParams::default(),
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        Ok(app_dir()?.join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let path = Self::default_path()?;
        if path.exists() {
            Self::read(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn clipboard_hold(&self) -> Duration {
        Duration::from_secs(self.clipboard_hold_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.clipboard_hold(), Duration::from_secs(30));
    }

    #[test]
    fn clipboard_hold_can_be_disabled() {
        let config = Config::from_toml("clipboard_hold_secs = 0
").unwrap();
        assert_eq!(config.clipboard_hold(), Duration::ZERO);
        assert!(config.clipboard);
    }

    #[test]
    fn partial_generation_table_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            backend_url = "https://assistant.example.org/api/v1"
            model = "gemini-1.5-flash"
            clipboard = false

            [generation]
            temperature = 0.3
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "https://assistant.example.org/api/v1");
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash"));
        assert!(!config.clipboard);
        assert!((config.generation.temperature - 0.3).abs() < f64::EPSILON);
        assert!((config.generation.top_p - 0.9).abs() < f64::EPSILON);
        assert!((config.generation.repetition_penalty - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let present = dir.path().join("config.toml");
        std::fs::write(&present, "timeout_secs = 5\n").unwrap();
        let config = Config::load(Some(&present)).unwrap();
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml("backend_url = [").is_err());
    }
}
