//! Load/save hooks for the persisted research settings.
//!
//! The research core never touches disk; it only receives the
//! `ProviderConfig` projected from what is loaded here.

use anyhow::{Context, Result};
use shared::settings::ResearchSettings;
use std::fs;
use std::path::{Path, PathBuf};

pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default settings file in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.local", "Research Helper", "ResearchHelper")
        .map(|p| p.config_dir().join("settings.json"))
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `override_path` when given, otherwise the platform default.
    pub fn open(override_path: Option<PathBuf>) -> Result<Self> {
        let path = match override_path {
            Some(p) => p,
            None => default_config_path().context("could not determine a config directory")?,
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the settings and whether they came from disk.
    pub fn load_or_default(&self) -> Result<(ResearchSettings, bool)> {
        if !self.path.exists() {
            return Ok((ResearchSettings::default(), false));
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let settings = serde_json::from_str::<ResearchSettings>(&contents)
            .with_context(|| format!("invalid settings file {}", self.path.display()))?;
        Ok((settings, true))
    }

    pub fn save(&self, settings: &ResearchSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::info!("saved settings to {}", self.path.display());
        Ok(())
    }

    /// Forget the saved settings. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}

/// Fill blank keys from the environment; saved keys win.
pub fn apply_env_keys(settings: &mut ResearchSettings, lookup: impl Fn(&str) -> Option<String>) {
    if settings.gemini_key.trim().is_empty() {
        if let Some(key) = lookup(GEMINI_KEY_ENV) {
            settings.gemini_key = key;
        }
    }
    if settings.openrouter_key.trim().is_empty() {
        if let Some(key) = lookup(OPENROUTER_KEY_ENV) {
            settings.openrouter_key = key;
        }
    }
}

/// Show only the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
