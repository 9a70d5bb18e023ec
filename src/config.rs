/*!
 * Translator configuration.
 *
 * Loads, validates and saves the settings the translator facade is built from.
 */

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::location::resolve_mapping_location;
use crate::store::StoreKind;

/// Represents the translator configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslatorConfig {
    /// Mapping store backend
    #[serde(default)]
    pub store: StoreKind,

    /// `file:` URL or path of the mapping data
    #[serde(default)]
    pub mapping_url: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl TranslatorConfig {
    /// Create a configuration for a store kind and location
    pub fn new(store: StoreKind, mapping_url: impl Into<String>) -> Self {
        Self {
            store,
            mapping_url: mapping_url.into(),
            log_level: LogLevel::default(),
        }
    }

    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Default config file location under the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(base_dir.join("sqlid-translator").join("config.json"))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.mapping_url.trim().is_empty() {
            return Err(anyhow!("The mapping file URL must be set"));
        }
        resolve_mapping_location(&self.mapping_url)?;
        Ok(())
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new(StoreKind::default(), String::new())
    }
}
