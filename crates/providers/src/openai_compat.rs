//! OpenAI-compatible chat completions adapter.
//!
//! Serves OpenAI and OpenRouter, and any other endpoint that speaks
//! `/chat/completions` with Bearer auth.

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

/// An OpenAI-compatible selection provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Self {
        Self {
            name: config.vendor.as_str().to_string(),
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
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": user_prompt },
            ],
        })
    }

    fn extract_text(response: ChatResponse) -> Result<String, SelectError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                SelectError::MalformedResponse("completion has no message content".into())
            })
    }
}

#[async_trait]
impl ItemSelector for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&prompt::build_prompt(context, candidates));

        debug!(
            provider = %self.name,
            model = %self.model,
            candidates = candidates.len(),
            "Sending selection request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| status::from_reqwest(&self.name, e))?;

        let response = status::check(&self.name, response).await?;
        let api_resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| status::from_reqwest(&self.name, e))?;

        let text = Self::extract_text(api_resp)?;
        prompt::match_candidate(&text, candidates)
    }

    /// Lists models to confirm the key works.
    async fn probe(&self) -> std::result::Result<bool, SelectError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| status::from_reqwest(&self.name, e))?;
        Ok(response.status().is_success())
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
