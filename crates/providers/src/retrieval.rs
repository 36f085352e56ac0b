//! Retrieval tier client.
//!
//! Talks to a remote semantic index keyed by corpus item ids. The request
//! carries only the categorical context plus a short natural-language query
//! rendered from it; raw readings never leave the process.
//!
//! Wire format:
//!
//! ```text
//! POST {endpoint}/select
//! {"context": {"stressLevel": "high", "timeOfDay": "morning", "isActive": false,
//!              "primaryTag": "stress"},
//!  "query": "very anxious and need calming guidance, starting my day"}
//!
//! 200 {"itemId": "letters-13", "score": 0.83}
//! ```
//!
//! `GET {endpoint}/health` answers the availability probe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stoa_core::context::{Context, PrimaryTag, StressLevel, TimeOfDay};
use stoa_core::error::SelectError;
use stoa_core::item::Item;
use stoa_core::selector::ItemSelector;
use tracing::debug;

use crate::status;

const SERVICE: &str = "retrieval";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalContext {
    pub stress_level: StressLevel,
    pub time_of_day: TimeOfDay,
    pub is_active: bool,
    pub primary_tag: PrimaryTag,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalRequest {
    pub context: RetrievalContext,
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalResponse {
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

impl RetrievalRequest {
    pub fn from_context(context: &Context) -> Self {
        Self {
            context: RetrievalContext {
                stress_level: context.stress_level,
                time_of_day: context.time_of_day,
                is_active: context.is_active,
                primary_tag: context.primary_tag,
            },
            query: build_query(context),
        }
    }
}

/// Describe the context the way a person would, for semantic search.
pub fn build_query(context: &Context) -> String {
    let stress = match context.stress_level {
        StressLevel::Low => "feeling calm and peaceful",
        StressLevel::Normal => "normal day, looking for wisdom",
        StressLevel::Elevated => "feeling stressed and need perspective",
        StressLevel::High => "very anxious and need calming guidance",
    };
    let time = match context.time_of_day {
        TimeOfDay::Morning => "starting my day",
        TimeOfDay::Afternoon => "middle of my day",
        TimeOfDay::Evening => "reflecting on my day",
        TimeOfDay::Night => "ending my day, preparing to rest",
    };

    let mut parts = vec![stress, time];
    if context.is_active {
        parts.push("during exercise or activity");
    }
    parts.join(", ")
}

/// HTTP client for the retrieval service.
pub struct RetrievalClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RetrievalClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: status::http_client(timeout),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl ItemSelector for RetrievalClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError> {
        let request = RetrievalRequest::from_context(context);
        debug!(query = %request.query, "Querying retrieval index");

        let response = self
            .authorized(self.client.post(format!("{}/select", self.endpoint)))
            .json(&request)
            .send()
            .await
            .map_err(|e| status::from_reqwest(SERVICE, e))?;

        let response = status::check(SERVICE, response).await?;
        let body: RetrievalResponse = response
            .json()
            .await
            .map_err(|e| status::from_reqwest(SERVICE, e))?;

        let item_id = body
            .item_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SelectError::MalformedResponse("retrieval response has no itemId".into())
            })?;

        let item = candidates
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| {
                let message = format!("retrieval returned unknown item '{item_id}'");
                SelectError::MalformedResponse(message)
            })?;

        debug!(item_id = %item.id, score = ?body.score, "Retrieval match");
        Ok(item)
    }

    async fn probe(&self) -> std::result::Result<bool, SelectError> {
        let response = self
            .authorized(self.client.get(format!("{}/health", self.endpoint)))
            .send()
            .await
            .map_err(|e| status::from_reqwest(SERVICE, e))?;
        Ok(response.status().is_success())
    }
}
