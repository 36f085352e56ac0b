//! Anthropic Messages API adapter.
//!
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - System prompt as a top-level field

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use stoa_core::context::Context;
use stoa_core::error::SelectError;
use stoa_core::item::Item;
use stoa_core::provider::ProviderConfig;
use stoa_core::selector::ItemSelector;
use tracing::debug;

use crate::prompt::{self, SYSTEM_INSTRUCTION};
use crate::status;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Self {
        Self {
            base_url: config.endpoint(),
            api_key: config.credential.clone(),
            model: config.model_id.clone(),
            max_tokens: config.max_output_tokens,
            client: status::http_client(timeout),
        }
    }

    fn request_body(&self, user_prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": 0.0,
            "system": SYSTEM_INSTRUCTION,
            "messages": [{ "role": "user", "content": user_prompt }],
        })
    }

    /// Concatenate the text blocks of a response.
    fn extract_text(response: AnthropicResponse) -> Result<String, SelectError> {
        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err(SelectError::MalformedResponse(
                "anthropic response has no text content".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ItemSelector for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.request_body(&prompt::build_prompt(context, candidates));

        debug!(
            provider = "anthropic",
            model = %self.model,
            candidates = candidates.len(),
            "Sending selection request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| status::from_reqwest("anthropic", e))?;

        let response = status::check("anthropic", response).await?;
        let api_resp: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| status::from_reqwest("anthropic", e))?;

        let text = Self::extract_text(api_resp)?;
        prompt::match_candidate(&text, candidates)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{candidates, spawn, stressed_morning};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use stoa_core::provider::Vendor;

    fn provider(base_url: &str) -> AnthropicProvider {
        let config = ProviderConfig::new(Vendor::Anthropic, "sk-ant-test").with_base_url(base_url);
        AnthropicProvider::new(&config, Duration::from_secs(5))
    }

    #[test]
    fn body_uses_top_level_system() {
        let body = provider("http://unused").request_body("pick one");
        assert_eq!(body["system"], SYSTEM_INSTRUCTION);
        assert_eq!(body["model"], "claude-3-5-haiku-20241022");
        assert_eq!(body["max_tokens"], 32);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "pick one");
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let resp: AnthropicResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "letters-13"}
            ]
        }))
        .unwrap();
        assert_eq!(AnthropicProvider::extract_text(resp).unwrap(), "letters-13");
    }

    #[test]
    fn extract_text_rejects_empty_content() {
        let resp: AnthropicResponse =
            serde_json::from_value(serde_json::json!({"content": []})).unwrap();
        assert!(matches!(
            AnthropicProvider::extract_text(resp),
            Err(SelectError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn selects_candidate_named_by_model() {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(headers["x-api-key"], "sk-ant-test");
                assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
                assert!(body["messages"][0]["content"].as_str().unwrap().contains("[letters-13]"));
                Json(serde_json::json!({
                    "content": [{"type": "text", "text": " letters-13\n"}]
                }))
            }),
        );
        let base = spawn(router).await;

        let item = provider(&base)
            .select_item(&stressed_morning(), &candidates())
            .await
            .unwrap();
        assert_eq!(item.id, "letters-13");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid x-api-key") }),
        );
        let base = spawn(router).await;

        let err = provider(&base)
            .select_item(&stressed_morning(), &candidates())
            .await
            .unwrap_err();
        assert!(matches!(err, SelectError::Auth(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_malformed() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async {
                Json(serde_json::json!({
                    "content": [{"type": "text", "text": "enchiridion-99"}]
                }))
            }),
        );
        let base = spawn(router).await;

        let err = provider(&base)
            .select_item(&stressed_morning(), &candidates())
            .await
            .unwrap_err();
        assert!(matches!(err, SelectError::MalformedResponse(_)));
    }
}
