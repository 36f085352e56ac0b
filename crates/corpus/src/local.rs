//! Local selector: the last line of defense.
//!
//! Deterministic filtering followed by a uniform random pick. No I/O, no
//! failure mode: the corpus is non-empty by construction, so a pick always
//! exists.
//!
//! An item matches a context when **any** of these hold:
//! - its preferred time of day is the context's, or `"any"`
//! - its tags contain the context's primary tag
//! - the context is stressed and the item prefers an elevated heart rate

use rand::Rng;
use stoa_core::context::Context;
use stoa_core::item::{Item, ANY};
use tracing::debug;

use crate::store::Corpus;

/// Preference value for passages meant for a raised heart rate.
const ELEVATED: &str = "elevated";

/// The dependency-free heuristic selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSelector;

impl LocalSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick an item for `context` using the thread-local RNG.
    pub fn select_item<'a>(&self, context: &Context, corpus: &'a Corpus) -> &'a Item {
        self.select_item_with_rng(context, corpus, &mut rand::rng())
    }

    /// Pick an item using a caller-supplied RNG (seeded in tests).
    pub fn select_item_with_rng<'a, R: Rng + ?Sized>(
        &self,
        context: &Context,
        corpus: &'a Corpus,
        rng: &mut R,
    ) -> &'a Item {
        let matching: Vec<&Item> = corpus.iter().filter(|item| matches(item, context)).collect();

        if matching.is_empty() {
            debug!(
                primary_tag = %context.primary_tag,
                "Local: no item matches context, choosing from whole corpus"
            );
            let all = corpus.items();
            return &all[rng.random_range(0..all.len())];
        }

        debug!(
            primary_tag = %context.primary_tag,
            matching = matching.len(),
            "Local: choosing among matching items"
        );
        matching[rng.random_range(0..matching.len())]
    }
}

/// Whether `item` suits `context` under the local filter.
pub fn matches(item: &Item, context: &Context) -> bool {
    let time_matches = item
        .preferred_time_of_day
        .as_deref()
        .is_some_and(|t| t == context.time_of_day.as_str() || t == ANY);

    let tag_matches = item.has_tag(context.primary_tag.as_str());

    let stress_matches = context.stress_level.is_stressed()
        && item.preferred_heart_rate_state.as_deref() == Some(ELEVATED);

    time_matches || tag_matches || stress_matches
}
