//! Wisdom items: the immutable entries of the corpus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value of a preference field that matches every context.
pub const ANY: &str = "any";

/// A single curated passage with selection metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique key; also the identifier space of the retrieval index.
    pub id: String,

    pub text: String,

    /// Who said or wrote it (e.g. "Seneca")
    pub attribution: String,

    /// Where it comes from (e.g. "Letters to Lucilius")
    pub source: String,

    /// Topical labels (e.g. "stress", "morning", "control")
    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_heart_rate_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_of_day: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_activity_state: Option<String>,
}

impl Item {
    /// Create an item with no tags or preferences.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        attribution: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            attribution: attribution.into(),
            source: source.into(),
            tags: BTreeSet::new(),
            preferred_heart_rate_state: None,
            preferred_time_of_day: None,
            preferred_activity_state: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: impl Into<String>) -> Self {
        self.preferred_time_of_day = Some(time_of_day.into());
        self
    }

    pub fn with_heart_rate_state(mut self, state: impl Into<String>) -> Self {
        self.preferred_heart_rate_state = Some(state.into());
        self
    }

    pub fn with_activity_state(mut self, state: impl Into<String>) -> Self {
        self.preferred_activity_state = Some(state.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// One-line rendering used in prompts and logs.
    pub fn summary(&self, max_chars: usize) -> String {
        let mut text: String = self.text.chars().take(max_chars).collect();
        if self.text.chars().count() > max_chars {
            text.push('…');
        }
        format!("{} — {}", text, self.attribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let item = Item::new("m-1", "Waste no more time.", "Marcus Aurelius", "Meditations")
            .with_tags(["morning", "time"])
            .with_time_of_day("morning")
            .with_heart_rate_state("normal");
        assert!(item.has_tag("morning"));
        assert!(!item.has_tag("stress"));
        assert_eq!(item.preferred_time_of_day.as_deref(), Some("morning"));
        assert_eq!(item.preferred_heart_rate_state.as_deref(), Some("normal"));
        assert!(item.preferred_activity_state.is_none());
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let item: Item = serde_json::from_str(
            r#"{"id":"e-1","text":"Wealth consists not in having great possessions.",
                "attribution":"Epictetus","source":"Fragments"}"#,
        )
        .unwrap();
        assert!(item.tags.is_empty());
        assert!(item.preferred_time_of_day.is_none());
    }

    #[test]
    fn summary_truncates_long_text() {
        let item = Item::new("s-1", "abcdefghij", "Seneca", "Letters");
        assert_eq!(item.summary(4), "abcd… — Seneca");
        assert_eq!(item.summary(20), "abcdefghij — Seneca");
    }
}
