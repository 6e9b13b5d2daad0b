//! Engine and logging configuration.
//!
//! Config files are TOML. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration. Environment variables
//! override file values:
//!
//! | Variable                    | Field                          |
//! |-----------------------------|--------------------------------|
//! | `ROSTER_MAX_NESTING_DEPTH`  | `hierarchy.max_nesting_depth`  |
//! | `ROSTER_PAGE_SIZE`          | `hierarchy.page_size`          |
//! | `ROSTER_LOG_LEVEL`          | `log.level`                    |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hierarchy resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Longest allowed chain of nested-list edges through any list.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Member page size requested from the backend. Zero lets the backend choose.
    #[serde(default)]
    pub page_size: usize,
}

fn default_max_nesting_depth() -> usize {
    10
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            page_size: 0,
        }
    }
}

impl HierarchyConfig {
    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(Error::config("hierarchy.max_nesting_depth must be at least 1"));
        }
        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Hierarchy resolution settings.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl RosterConfig {
    /// Parses a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RosterConfig = toml::from_str(content)?;
        config.hierarchy.validate()?;
        Ok(config)
    }

    /// Loads a config file and applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise starts from defaults. Environment
    /// overrides apply in both cases.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides(|key| std::env::var(key).ok())?;
                Ok(config)
            }
        }
    }

    /// Applies overrides looked up through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ROSTER_MAX_NESTING_DEPTH") {
            self.hierarchy.max_nesting_depth = parse_usize("ROSTER_MAX_NESTING_DEPTH", &value)?;
        }
        if let Some(value) = lookup("ROSTER_PAGE_SIZE") {
            self.hierarchy.page_size = parse_usize("ROSTER_PAGE_SIZE", &value)?;
        }
        if let Some(value) = lookup("ROSTER_LOG_LEVEL") {
            self.log.level = value;
        }
        self.hierarchy.validate()
    }

    /// Serialises to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key} must be a non-negative integer, got '{value}'")))
}
