//! Configuration Management
//!
//! Handles persistent configuration storage for qsgroup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default state file name, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "qsgroup.state.json";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Named profile from the shared AWS config files
    #[serde(default)]
    pub profile: Option<String>,
    /// Default account for resources that do not name one
    #[serde(default)]
    pub account_id: Option<String>,
    /// Endpoint override (e.g. a local mock)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Where resource state is stored
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qsgroup").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from a specific file; missing or unreadable files yield defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective state file path (CLI > config > ./qsgroup.state.json)
    pub fn effective_state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    /// Overlay values given on the command line
    pub fn with_overrides(
        mut self,
        region: Option<String>,
        profile: Option<String>,
        account_id: Option<String>,
        endpoint: Option<String>,
        state_path: Option<PathBuf>,
    ) -> Self {
        self.region = region.or(self.region);
        self.profile = profile.or(self.profile);
        self.account_id = account_id.or(self.account_id);
        self.endpoint = endpoint.or(self.endpoint);
        self.state_path = state_path.or(self.state_path);
        self
    }
}
