//! Provider registry: turns a `ProviderConfig` into a concrete adapter.
//!
//! The adapter set is closed: [`ProviderClient`] has one variant per adapter
//! family and dispatches by `match`, never by string lookup.

use async_trait::async_trait;
use std::time::Duration;
use stoa_core::context::Context;
use stoa_core::error::{Error, SelectError};
use stoa_core::item::Item;
use stoa_core::provider::{ProviderConfig, Vendor};
use stoa_core::selector::ItemSelector;
use tracing::debug;

use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Default per-request timeout for generative providers.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Credential values that only ever appear in templates and docs.
const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "your-api-key",
    "your_api_key",
    "your-api-key-here",
    "api-key",
    "<api-key>",
    "<your-api-key>",
    "changeme",
    "change-me",
    "replace-me",
    "sk-...",
    "sk-xxx",
    "xxx",
    "todo",
];

/// Known-good model ids per vendor; the first is the default.
const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-haiku-20241022",
    "claude-3-5-sonnet-20241022",
    "claude-3-haiku-20240307",
];
const OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini", "gpt-4.1-nano"];
const OPENROUTER_MODELS: &[&str] = &[
    "openai/gpt-4o-mini",
    "anthropic/claude-3.5-haiku",
    "google/gemini-flash-1.5",
    "meta-llama/llama-3.1-8b-instruct",
];
const GEMINI_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-flash"];

/// One constructed generative-model adapter.
pub enum ProviderClient {
    Anthropic(AnthropicProvider),
    OpenAiCompat(OpenAiCompatProvider),
    Gemini(GeminiProvider),
}

#[async_trait]
impl ItemSelector for ProviderClient {
    fn name(&self) -> &str {
        match self {
            Self::Anthropic(p) => p.name(),
            Self::OpenAiCompat(p) => p.name(),
            Self::Gemini(p) => p.name(),
        }
    }

    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError> {
        match self {
            Self::Anthropic(p) => p.select_item(context, candidates).await,
            Self::OpenAiCompat(p) => p.select_item(context, candidates).await,
            Self::Gemini(p) => p.select_item(context, candidates).await,
        }
    }

    async fn probe(&self) -> std::result::Result<bool, SelectError> {
        match self {
            Self::Anthropic(p) => p.probe().await,
            Self::OpenAiCompat(p) => p.probe().await,
            Self::Gemini(p) => p.probe().await,
        }
    }
}

/// Builds provider adapters from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRegistry {
    timeout: Duration,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_TIMEOUT)
    }
}

impl ProviderRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Construct the adapter for `config`.
    ///
    /// Fails only when the credential is missing or a placeholder. A present
    /// but wrong key is accepted here and surfaces as `Auth` on first use.
    pub fn resolve(&self, config: &ProviderConfig) -> Result<ProviderClient, Error> {
        if !Self::is_configured(config) {
            return Err(Error::config(format!(
                "provider '{}' has no usable credential (set {} or provider.api_key)",
                config.vendor,
                config.vendor.credential_env()
            )));
        }

        debug!(vendor = %config.vendor, model = %config.model_id, "Resolving provider");

        Ok(match config.vendor {
            Vendor::Anthropic => {
                ProviderClient::Anthropic(AnthropicProvider::new(config, self.timeout))
            }
            Vendor::OpenAi | Vendor::OpenRouter => {
                ProviderClient::OpenAiCompat(OpenAiCompatProvider::new(config, self.timeout))
            }
            Vendor::Gemini => ProviderClient::Gemini(GeminiProvider::new(config, self.timeout)),
        })
    }

    /// Whether `config` carries a credential worth trying.
    pub fn is_configured(config: &ProviderConfig) -> bool {
        let credential = config.credential.trim();
        if credential.is_empty() {
            return false;
        }
        let lower = credential.to_ascii_lowercase();
        !PLACEHOLDER_CREDENTIALS.contains(&lower.as_str())
    }

    pub fn available_models(vendor: Vendor) -> &'static [&'static str] {
        match vendor {
            Vendor::Anthropic => ANTHROPIC_MODELS,
            Vendor::OpenAi => OPENAI_MODELS,
            Vendor::OpenRouter => OPENROUTER_MODELS,
            Vendor::Gemini => GEMINI_MODELS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_not_configured() {
        for placeholder in ["", "   ", "your-api-key", "CHANGEME", "sk-...", "<api-key>"] {
            let config = ProviderConfig::new(Vendor::OpenAi, placeholder);
            assert!(!ProviderRegistry::is_configured(&config), "{placeholder:?}");
        }
        assert!(ProviderRegistry::is_configured(&ProviderConfig::new(
            Vendor::OpenAi,
            "sk-proj-abc123"
        )));
    }

    #[test]
    fn resolve_rejects_unconfigured_vendor() {
        let config = ProviderConfig::new(Vendor::Anthropic, "");
        let result = ProviderRegistry::default().resolve(&config);
        match result {
            Err(Error::Config { message }) => assert!(message.contains("ANTHROPIC_API_KEY")),
            Err(other) => panic!("Expected Config error, got: {other:?}"),
            Ok(_) => panic!("Expected Config error, got a client"),
        }
    }

    #[test]
    fn resolve_picks_adapter_family() {
        let registry = ProviderRegistry::default();
        let cases = [
            (Vendor::Anthropic, "anthropic"),
            (Vendor::OpenAi, "openai"),
            (Vendor::OpenRouter, "openrouter"),
            (Vendor::Gemini, "gemini"),
        ];
        for (vendor, name) in cases {
            let config = ProviderConfig::new(vendor, "real-looking-key");
            let client = registry.resolve(&config).unwrap();
            assert_eq!(client.name(), name);
        }

        let client = registry
            .resolve(&ProviderConfig::new(Vendor::OpenRouter, "k"))
            .unwrap();
        assert!(matches!(client, ProviderClient::OpenAiCompat(_)));
    }

    #[test]
    fn default_model_heads_available_list() {
        for vendor in Vendor::ALL {
            let models = ProviderRegistry::available_models(vendor);
            assert_eq!(models.first().copied(), Some(vendor.default_model()));
        }
    }

    #[tokio::test]
    async fn wrong_key_fails_only_at_call_time() {
        use crate::test_support::{candidates, spawn, stressed_morning};
        use axum::http::StatusCode;
        use axum::routing::post;
        use axum::Router;

        let base = spawn(Router::new().route(
            "/chat/completions",
            post(|| async { StatusCode::UNAUTHORIZED }),
        ))
        .await;
        let client = ProviderRegistry::default()
            .resolve(&ProviderConfig::new(Vendor::OpenAi, "sk-wrong").with_base_url(&base))
            .unwrap();

        let err = client
            .select_item(&stressed_morning(), &candidates())
            .await
            .unwrap_err();
        assert!(matches!(err, SelectError::Auth(_)));
    }
}
