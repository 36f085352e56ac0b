//! Configuration loading, validation, and management for Stoa.
//!
//! Loads configuration from `~/.stoa/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stoa_core::provider::{DEFAULT_MAX_OUTPUT_TOKENS, ProviderConfig, Vendor};

/// The root configuration structure.
///
/// Maps directly to `~/.stoa/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative-model tier
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Semantic-retrieval tier
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Orchestration knobs
    #[serde(default)]
    pub selection: SelectionSettings,

    /// Corpus source
    #[serde(default)]
    pub corpus: CorpusSettings,
}

fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_vendor")]
    pub vendor: Vendor,

    /// Model id; the vendor default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint override (proxies, self-hosted gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_vendor() -> Vendor {
    Vendor::OpenAi
}
fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}
fn default_provider_timeout() -> u64 {
    15
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            vendor: default_vendor(),
            model: None,
            api_key: None,
            api_url: None,
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("enabled", &self.enabled)
            .field("vendor", &self.vendor)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the semantic-search service (`/select`, `/health`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_retrieval_timeout")]
    pub timeout_secs: u64,

    /// Probe `/health` once per session before the first real call
    #[serde(default = "default_true")]
    pub probe: bool,
}

fn default_retrieval_timeout() -> u64 {
    5
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout_secs: default_retrieval_timeout(),
            probe: true,
        }
    }
}

impl std::fmt::Debug for RetrievalSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalSettings")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("probe", &self.probe)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Upper bound on candidates sent to a generative model
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_max_candidates() -> usize {
    20
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSettings {
    /// JSON corpus file; the built-in corpus when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Derive missing tags and preferences from keyword rules
    #[serde(default = "default_true")]
    pub auto_tag: bool,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: None,
            auto_tag: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.stoa/config.toml).
    ///
    /// Also checks environment variables:
    /// - `STOA_VENDOR`, `STOA_MODEL`
    /// - `STOA_API_KEY` (highest priority), then the vendor's own key variable
    /// - `STOA_RETRIEVAL_URL`, `STOA_RETRIEVAL_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(vendor) = lookup("STOA_VENDOR") {
            self.provider.vendor = vendor
                .parse()
                .map_err(ConfigError::ValidationError)?;
        }

        if let Some(model) = lookup("STOA_MODEL") {
            self.provider.model = Some(model);
        }

        if let Some(key) = lookup("STOA_API_KEY") {
            self.provider.api_key = Some(key);
        } else if self.provider.api_key.is_none() {
            self.provider.api_key = lookup(self.provider.vendor.credential_env());
        }

        if let Some(url) = lookup("STOA_RETRIEVAL_URL") {
            self.retrieval.endpoint = Some(url);
        }

        if let Some(key) = lookup("STOA_RETRIEVAL_KEY") {
            self.retrieval.api_key = Some(key);
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".stoa")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.max_candidates == 0 {
            return Err(ConfigError::ValidationError(
                "selection.max_candidates must be > 0".into(),
            ));
        }

        if self.provider.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_output_tokens must be > 0".into(),
            ));
        }

        if self.provider.timeout_secs == 0 || self.retrieval.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".into(),
            ));
        }

        if let Some(endpoint) = &self.retrieval.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "retrieval.endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }

        Ok(())
    }

    /// The provider configuration value handed to the registry.
    pub fn provider_config(&self) -> ProviderConfig {
        let settings = &self.provider;
        let mut config = ProviderConfig::new(
            settings.vendor,
            settings.api_key.clone().unwrap_or_default(),
        )
        .with_max_output_tokens(settings.max_output_tokens);

        if let Some(model) = &settings.model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &settings.api_url {
            config = config.with_base_url(url.clone());
        }
        config
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for stoa_core::Error {
    fn from(err: ConfigError) -> Self {
        stoa_core::Error::config(err.to_string())
    }
}
