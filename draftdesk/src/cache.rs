//! Local cache of the current draft session.
//!
//! Each CLI invocation restores the session from `~/.draftdesk/session.json`
//! and writes it back afterwards. The cache is a convenience only: a missing,
//! unreadable or inconsistent file means starting from an empty session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::drafting::DraftSession;

/// Application directory under the home directory.
pub const APP_DIR: &str = ".draftdesk";
const SESSION_FILE: &str = "session.json";

/// Resolve `~/.draftdesk`.
pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(APP_DIR))
}

/// File-backed store for one [`DraftSession`].
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at `~/.draftdesk/session.json`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::at(app_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the cached session, if there is a usable one.
    pub fn load(&self) -> Option<DraftSession> {
        if !self.path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read session cache");
                return None;
            }
        };

        match serde_json::from_str::<DraftSession>(&content) {
            Ok(session) if session.is_well_formed() => {
                debug!(
                    path = %self.path.display(),
                    drafts = session.responses().len(),
                    "restored draft session"
                );
                Some(session)
            }
            Ok(_) => {
                warn!(path = %self.path.display(), "ignoring inconsistent session cache");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt session cache");
                None
            }
        }
    }

    /// Write the session, replacing any previous cache.
    pub fn save(&self, session: &DraftSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the cache file.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}
