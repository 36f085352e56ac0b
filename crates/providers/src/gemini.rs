//! Google Gemini `generateContent` adapter.
//!
//! Auth goes in the `x-goog-api-key` header rather than the query string so
//! the key never shows up in logged URLs.

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

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl GeminiProvider {
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
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": 0.0,
            },
        })
    }

    fn extract_text(response: GenerateResponse) -> Result<String, SelectError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(SelectError::MalformedResponse(
                "gemini response has no candidate text".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ItemSelector for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.request_body(&prompt::build_prompt(context, candidates));

        debug!(
            provider = "gemini",
            model = %self.model,
            candidates = candidates.len(),
            "Sending selection request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| status::from_reqwest("gemini", e))?;

        let response = status::check("gemini", response).await?;
        let api_resp: GenerateResponse = response
            .json()
            .await
            .map_err(|e| status::from_reqwest("gemini", e))?;

        let text = Self::extract_text(api_resp)?;
        prompt::match_candidate(&text, candidates)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}
