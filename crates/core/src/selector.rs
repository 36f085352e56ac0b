//! ItemSelector trait: the one contract shared by every remote tier.
//!
//! A selector receives the discrete [`Context`] and a candidate list and
//! returns exactly one of those candidates. The retrieval client and every
//! generative-model adapter implement it; the orchestrator calls
//! `select_item()` without knowing which backend it is talking to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::Context;
use crate::error::SelectError;
use crate::item::Item;

/// One of the three selection strategies, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Retrieval,
    Provider,
    Local,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieval => "retrieval",
            Self::Provider => "provider",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The answer to one selection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub item: Item,

    /// Which tier produced the item (diagnostics only)
    pub served_by: Tier,
}

/// The core selection trait.
#[async_trait]
pub trait ItemSelector: Send + Sync {
    /// A human-readable name for logs (e.g. "anthropic", "retrieval").
    fn name(&self) -> &str;

    /// Pick one of `candidates` for `context`.
    ///
    /// The returned item must be a member of `candidates`. Implementations
    /// never retry and never fall back on their own.
    async fn select_item(
        &self,
        context: &Context,
        candidates: &[Item],
    ) -> std::result::Result<Item, SelectError>;

    /// Health check: is the backend reachable and willing?
    async fn probe(&self) -> std::result::Result<bool, SelectError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{classify, RawSignals};

    struct FirstCandidate;

    #[async_trait]
    impl ItemSelector for FirstCandidate {
        fn name(&self) -> &str {
            "first"
        }

        async fn select_item(
            &self,
            _context: &Context,
            candidates: &[Item],
        ) -> std::result::Result<Item, SelectError> {
            candidates
                .first()
                .cloned()
                .ok_or_else(|| SelectError::MalformedResponse("no candidates".into()))
        }
    }

    #[tokio::test]
    async fn default_probe_reports_healthy() {
        assert!(FirstCandidate.probe().await.unwrap());
    }

    #[tokio::test]
    async fn selector_returns_candidate() {
        let ctx = classify(
            &RawSignals::default(),
            &chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let items = vec![Item::new("a", "text", "Seneca", "Letters")];
        let picked = FirstCandidate.select_item(&ctx, &items).await.unwrap();
        assert_eq!(picked.id, "a");
    }

    #[test]
    fn tier_serializes_lowercase() {
        let result = SelectionResult {
            item: Item::new("a", "text", "Seneca", "Letters"),
            served_by: Tier::Local,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["served_by"], "local");
        assert_eq!(Tier::Retrieval.to_string(), "retrieval");
    }
}
