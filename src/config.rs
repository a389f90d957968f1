//! Engine Configuration
//!
//! JSON config file with defaults for anything omitted, plus environment
//! overrides for the API endpoint and token.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;

/// Item cap for accounts without the administrator role.
pub const FREE_TIER_ITEM_LIMIT: usize = 100;

pub const ENV_API_URL: &str = "NOTE_TREE_API_URL";
pub const ENV_API_TOKEN: &str = "NOTE_TREE_API_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// `None` means unlimited.
    pub item_limit: Option<usize>,
    pub history_limit: usize,
    pub cache_keys: CacheKeys,
    pub channel_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            item_limit: Some(FREE_TIER_ITEM_LIMIT),
            history_limit: DEFAULT_HISTORY_LIMIT,
            cache_keys: CacheKeys::default(),
            channel_name: "notes-tree-sync".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn for_account(is_admin: bool) -> Self {
        Self {
            item_limit: (!is_admin).then_some(FREE_TIER_ITEM_LIMIT),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheKeys {
    pub tree: String,
    pub expansion: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            tree: "notesTree".to_string(),
            expansion: "expandedFolders".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read `path`, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let mut config = Self::from_json(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Override API settings from `lookup` (normally the process env).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }
}
