//! Provider vocabulary: which generative-model vendor, and how to reach it.
//!
//! The set of vendors is closed: each one maps onto exactly one adapter in
//! `stoa-providers`. Vendor names are parsed once, at config load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output budget; an identifier never needs more.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 32;

/// A generative-model vendor with a built-in adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    #[serde(alias = "claude")]
    Anthropic,
    OpenAi,
    OpenRouter,
    #[serde(alias = "google")]
    Gemini,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [
        Vendor::Anthropic,
        Vendor::OpenAi,
        Vendor::OpenRouter,
        Vendor::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
        }
    }

    /// Model used when the configuration names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-haiku-20241022",
            Self::OpenAi => "gpt-4o-mini",
            Self::OpenRouter => "openai/gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Environment variable conventionally holding this vendor's key.
    pub fn credential_env(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown vendor: {other}")),
        }
    }
}

/// Everything needed to construct one provider adapter.
///
/// Built once from process configuration and never mutated.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub vendor: Vendor,

    pub model_id: String,

    #[serde(default)]
    pub credential: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Override the vendor's default endpoint (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

impl ProviderConfig {
    /// A config for `vendor` with its default model.
    pub fn new(vendor: Vendor, credential: impl Into<String>) -> Self {
        Self {
            vendor,
            model_id: vendor.default_model().into(),
            credential: credential.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// The configured endpoint, or the vendor default, without a trailing slash.
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.vendor.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("vendor", &self.vendor)
            .field("model_id", &self.model_id)
            .field(
                "credential",
                &if self.credential.is_empty() {
                    "None"
                } else {
                    "[REDACTED]"
                },
            )
            .field("max_output_tokens", &self.max_output_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_parsing_accepts_aliases() {
        assert_eq!("Anthropic".parse::<Vendor>().unwrap(), Vendor::Anthropic);
        assert_eq!("google".parse::<Vendor>().unwrap(), Vendor::Gemini);
        assert_eq!("openrouter".parse::<Vendor>().unwrap(), Vendor::OpenRouter);
        assert!("mystery".parse::<Vendor>().is_err());
    }

    #[test]
    fn vendor_serde_uses_lowercase() {
        let json = serde_json::to_string(&Vendor::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let back: Vendor = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(back, Vendor::Gemini);
    }

    #[test]
    fn vendor_serde_accepts_parse_aliases() {
        for alias in ["claude", "google"] {
            let parsed: Vendor = alias.parse().unwrap();
            let deserialized: Vendor = serde_json::from_str(&format!("\"{alias}\"")).unwrap();
            assert_eq!(parsed, deserialized);
        }
    }

    #[test]
    fn config_defaults_to_vendor_model() {
        let config = ProviderConfig::new(Vendor::OpenAi, "sk-live");
        assert_eq!(config.model_id, "gpt-4o-mini");
        assert_eq!(config.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(config.endpoint(), "https://api.openai.com/v1");
    }

    #[test]
    fn endpoint_override_strips_trailing_slash() {
        let config =
            ProviderConfig::new(Vendor::Anthropic, "k").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000");
    }

    #[test]
    fn debug_redacts_credential() {
        let config = ProviderConfig::new(Vendor::Gemini, "super-secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
