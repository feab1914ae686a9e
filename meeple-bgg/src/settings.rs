//! Settings for talking to BoardGameGeek.
//!
//! Values come from, in priority order: `MEEPLE_*` environment variables,
//! `~/.config/meeple/settings.toml`, built-in defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::EnrichError;
use crate::fetcher::{PROCESSING_STATUS, RetryPolicy};
use crate::urls::DEFAULT_BASE_URL;

const ENV_BASE_URL: &str = "MEEPLE_BASE_URL";
const ENV_USER_AGENT: &str = "MEEPLE_USER_AGENT";
const ENV_TIMEOUT_SECS: &str = "MEEPLE_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "MEEPLE_MAX_RETRIES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BggSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for BggSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("meeple/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub processing_status: u16,
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            processing_status: PROCESSING_STATUS,
            max_retries: policy.max_retries,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

/// Everything in `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bgg: BggSettings,
    pub retry: RetrySettings,
}

/// Where a setting's effective value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of the settings that can be overridden from the environment.
#[derive(Debug)]
pub struct SettingSources {
    pub base_url: SettingSource,
    pub user_agent: SettingSource,
    pub timeout_secs: SettingSource,
    pub max_retries: SettingSource,
}

/// Path to the settings file: `~/.config/meeple/settings.toml`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("meeple").join("settings.toml"))
}

impl Settings {
    /// Load the settings file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, EnrichError> {
        let mut settings = match load_file_contents() {
            Some(contents) => Self::from_toml_str(&contents)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, EnrichError> {
        toml::from_str(contents)
            .map_err(|e| EnrichError::config(format!("Failed to parse settings: {e}")))
    }

    pub fn to_toml_string(&self) -> Result<String, EnrichError> {
        toml::to_string_pretty(self)
            .map_err(|e| EnrichError::config(format!("Failed to serialize settings: {e}")))
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), EnrichError> {
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.bgg.base_url = v;
        }
        if let Some(v) = lookup(ENV_USER_AGENT) {
            self.bgg.user_agent = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.bgg.timeout_secs = parse_env(ENV_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_RETRIES) {
            self.retry.max_retries = parse_env(ENV_MAX_RETRIES, &v)?;
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            processing_status: self.retry.processing_status,
            max_retries: self.retry.max_retries,
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, EnrichError> {
    value
        .trim()
        .parse()
        .map_err(|_| EnrichError::config(format!("${key} is not a valid number: {value:?}")))
}

fn load_file_contents() -> Option<String> {
    let path = settings_path()?;
    std::fs::read_to_string(&path).ok()
}

/// Determine where each overridable setting is coming from.
pub fn setting_sources() -> SettingSources {
    let file: Option<toml::Value> = load_file_contents().and_then(|c| c.parse().ok());
    let in_file = |table: &str, key: &str| {
        file.as_ref()
            .and_then(|doc| doc.get(table))
            .and_then(|t| t.get(key))
            .is_some()
    };
    let source = |var: &'static str, table: &str, key: &str| {
        if std::env::var(var).is_ok() {
            SettingSource::EnvVar(var)
        } else if in_file(table, key) {
            SettingSource::ConfigFile
        } else {
            SettingSource::Default
        }
    };

    SettingSources {
        base_url: source(ENV_BASE_URL, "bgg", "base_url"),
        user_agent: source(ENV_USER_AGENT, "bgg", "user_agent"),
        timeout_secs: source(ENV_TIMEOUT_SECS, "bgg", "timeout_secs"),
        max_retries: source(ENV_MAX_RETRIES, "retry", "max_retries"),
    }
}
