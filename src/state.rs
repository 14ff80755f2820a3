//! Local state file
//!
//! Maps resource addresses (labels such as `main`) to the resource type and
//! its [`ResourceData`]. The identifier stored here is the only key used for
//! later lookups.

use crate::resource::ResourceData;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current on-disk format version
pub const STATE_VERSION: u32 = 1;

/// One managed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(flatten)]
    pub data: ResourceData,
}

/// Whole state file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, StoredResource>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    /// Load from disk; a missing file is an empty state
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {:?}", path))?;
        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {:?}", path))?;

        if state.version > STATE_VERSION {
            bail!(
                "State file {:?} has version {}, this build understands up to {}",
                path,
                state.version,
                STATE_VERSION
            );
        }

        Ok(state)
    }

    /// Save to disk via a temporary file and rename
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write state file {:?}", tmp))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file {:?}", path))?;

        Ok(())
    }

    pub fn get(&self, address: &str) -> Option<&StoredResource> {
        self.resources.get(address)
    }

    /// Store `data`, or drop the entry when the identifier is empty
    pub fn put(&mut self, address: &str, resource_type: &str, data: ResourceData) {
        if data.exists() {
            self.resources.insert(
                address.to_string(),
                StoredResource {
                    resource_type: resource_type.to_string(),
                    data,
                },
            );
        } else {
            self.resources.remove(address);
        }
    }

    pub fn remove(&mut self, address: &str) -> Option<StoredResource> {
        self.resources.remove(address)
    }
}
