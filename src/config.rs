//! Configuration management for smart-complete.
//!
//! Loads a TOML file with a `[defaults]` table and named `[fields.<name>]`
//! profiles. A profile carries the same settings as `[defaults]` plus where
//! its candidates come from.

use crate::autocomplete::{Candidate, OptionOverrides, SettingsOverrides, Source};
use crate::error::{Result, SmartCompleteError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Settings applied to every field.
    #[serde(default)]
    pub defaults: SettingsOverrides,

    /// Named field profiles.
    #[serde(default)]
    pub fields: HashMap<String, FieldProfile>,
}

/// Configuration of one named field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldProfile {
    #[serde(flatten)]
    pub settings: SettingsOverrides,

    /// Inline candidates.
    pub source: Option<Vec<Candidate>>,

    /// Newline-separated candidate file.
    pub source_file: Option<PathBuf>,

    /// Remote endpoint queried with `?term=`.
    pub url: Option<String>,
}

impl FieldProfile {
    /// Builds the profile's source, if it names one.
    ///
    /// Naming more than one source is an error.
    pub fn to_source(&self) -> Result<Option<Source>> {
        let named = [
            self.source.is_some(),
            self.source_file.is_some(),
            self.url.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if named > 1 {
            return Err(SmartCompleteError::config(
                "A field may set only one of 'source', 'source_file' and 'url'",
            ));
        }

        if let Some(list) = &self.source {
            return Ok(Some(Source::list(list.iter().cloned())));
        }
        if let Some(path) = &self.source_file {
            return Source::from_file(path).map(Some);
        }
        if let Some(url) = &self.url {
            return Source::remote(url).map(Some);
        }
        Ok(None)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("smart-complete")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SmartCompleteError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SmartCompleteError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named field profile.
    pub fn get_field(&self, name: &str) -> Option<&FieldProfile> {
        self.fields.get(name)
    }

    /// Resolves `[defaults]` and the named profile into field overrides.
    pub fn resolve_field(&self, name: Option<&str>) -> Result<OptionOverrides> {
        let mut settings = self.defaults.clone();
        let mut source = None;

        if let Some(name) = name {
            let profile = self.get_field(name).ok_or_else(|| {
                SmartCompleteError::config(format!("Field '{name}' not found in config file"))
            })?;
            settings.merge(&profile.settings);
            source = profile.to_source()?;
        }

        let mut overrides = OptionOverrides::from_settings(settings);
        overrides.source = source;
        Ok(overrides)
    }
}
