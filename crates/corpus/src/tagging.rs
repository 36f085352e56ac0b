//! Rule-based tagging: keyword heuristics for untagged passages.
//!
//! Instant and free, not as accurate as a curated label. Rules only ever fill
//! gaps: curated tags and preferences are left as they are.
//!
//! Matching works on lowercase word tokens. A single-word keyword matches
//! itself or one of its plain inflections ("disturb" matches "disturbs" and
//! "disturbed", never "fearless" for "fear"); a multi-word keyword matches
//! as a phrase.

use std::collections::BTreeSet;
use stoa_core::item::Item;

/// Suffixes a single-word keyword may carry and still match.
const INFLECTIONS: &[&str] = &["s", "es", "d", "ed", "ing"];

/// Tag → keywords that imply it.
const TOPIC_RULES: &[(&str, &[&str])] = &[
    (
        "stress",
        &[
            "anxious", "anxiety", "worry", "worried", "fear", "fearful", "afraid",
            "frighten", "dread", "troubled", "disturb", "disturbance", "anger",
            "angry", "rage", "fury", "wrath", "pained", "upset",
        ],
    ),
    (
        "calm",
        &[
            "peace", "calm", "tranquil", "tranquility", "tranquillity", "serene",
            "serenity", "quiet", "stillness",
        ],
    ),
    (
        "morning",
        &["morning", "dawn", "arise", "rising", "risest", "wake", "waking", "begin the day"],
    ),
    (
        "evening",
        &["evening", "night", "sleep", "end of day", "examine my", "review", "bed"],
    ),
    (
        "active",
        &[
            "training", "exercise", "hard work", "labor", "labour", "toil",
            "endure", "effort", "body", "exertion",
        ],
    ),
    (
        "control",
        &["in our power", "in thy power", "control", "up to us", "depends on us"],
    ),
    (
        "memento_mori",
        &[
            "death", "die", "dying", "mortal", "mortality", "depart from life",
            "life is short",
        ],
    ),
    (
        "present_moment",
        &["present", "today", "this moment", "at hand"],
    ),
    (
        "acceptance",
        &[
            "accept", "acceptance", "fate", "fortune", "providence",
            "as they do happen",
        ],
    ),
    (
        "judgement",
        &["judgement", "judgment", "opinion", "notions", "impression"],
    ),
];

/// Keyword-derived labels for one passage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    pub tags: BTreeSet<String>,
    pub heart_rate_state: Option<&'static str>,
    pub time_of_day: Option<&'static str>,
    pub activity_state: Option<&'static str>,
}

/// Run every rule against `text`.
pub fn derive(text: &str) -> Derived {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let phrase_text = tokens.join(" ");

    let mut tags = BTreeSet::new();
    for (tag, keywords) in TOPIC_RULES {
        if keywords
            .iter()
            .any(|keyword| keyword_matches(keyword, &tokens, &phrase_text))
        {
            tags.insert((*tag).to_string());
        }
    }

    let heart_rate_state = if tags.contains("stress") {
        Some("elevated")
    } else if tags.contains("calm") {
        Some("low")
    } else {
        None
    };

    // Morning wins when a passage mentions both ends of the day.
    let time_of_day = if tags.contains("morning") {
        Some("morning")
    } else if tags.contains("evening") {
        Some("evening")
    } else if tags.contains("memento_mori") {
        Some("evening")
    } else {
        None
    };

    let activity_state = tags.contains("active").then_some("active");

    Derived {
        tags,
        heart_rate_state,
        time_of_day,
        activity_state,
    }
}

fn keyword_matches(keyword: &str, tokens: &[&str], phrase_text: &str) -> bool {
    if keyword.contains(' ') {
        phrase_text.contains(keyword)
    } else {
        tokens.iter().any(|token| match token.strip_prefix(keyword) {
            Some("") => true,
            Some(rest) => INFLECTIONS.contains(&rest),
            None => false,
        })
    }
}

/// Fill empty tags and unset preferences of `item` from its text.
pub fn tag_item(mut item: Item) -> Item {
    let derived = derive(&item.text);

    if item.tags.is_empty() {
        item.tags = derived.tags;
    }
    if item.preferred_heart_rate_state.is_none() {
        item.preferred_heart_rate_state = derived.heart_rate_state.map(String::from);
    }
    if item.preferred_time_of_day.is_none() {
        item.preferred_time_of_day = derived.time_of_day.map(String::from);
    }
    if item.preferred_activity_state.is_none() {
        item.preferred_activity_state = derived.activity_state.map(String::from);
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anxiety_vocabulary_implies_stress() {
        let derived = derive("We suffer more often in imagination; do not be AFRAID.");
        assert!(derived.tags.contains("stress"));
        assert_eq!(derived.heart_rate_state, Some("elevated"));
    }

    #[test]
    fn prefix_matching_on_tokens() {
        let derived = derive("Never let the future disturb you.");
        assert!(derived.tags.contains("stress"));
        // "disturbs" also matches, but "undisturbed" does not start with the keyword
        assert!(derive("It disturbs thee").tags.contains("stress"));
        assert!(!derive("He stayed undisturbed").tags.contains("stress"));
    }

    #[test]
    fn longer_words_sharing_a_keyword_prefix_do_not_match() {
        assert!(!derive("He walked on, fearless").tags.contains("stress"));
        assert!(!derive("She kept to her diet").tags.contains("memento_mori"));
        assert!(!derive("Down the hall to the toilet").tags.contains("active"));
        assert!(!derive("An effortless grace").tags.contains("active"));
    }

    #[test]
    fn inflected_keywords_match() {
        assert!(derive("Men feared the storm").tags.contains("stress"));
        assert!(derive("All things die and are renewed").tags.contains("memento_mori"));
        assert!(derive("He toiled through the heat").tags.contains("active"));
        assert!(derive("Rising early and training daily").tags.contains("active"));
    }

    #[test]
    fn phrases_match_across_punctuation() {
        let derived = derive("Some things are in our power, others are not.");
        assert!(derived.tags.contains("control"));
    }

    #[test]
    fn time_preferences() {
        assert_eq!(derive("At dawn, when you arise").time_of_day, Some("morning"));
        assert_eq!(derive("Go to your sleep gladly").time_of_day, Some("evening"));
        assert_eq!(derive("Death smiles at us all").time_of_day, Some("evening"));
        assert_eq!(derive("Wealth is not possessions").time_of_day, None);
    }

    #[test]
    fn calm_passages_prefer_low_heart_rate() {
        let derived = derive("A settled calm of the mind.");
        assert!(derived.tags.contains("calm"));
        assert_eq!(derived.heart_rate_state, Some("low"));
    }

    #[test]
    fn exertion_implies_active() {
        let derived = derive("Training of the body fortifies the soul.");
        assert!(derived.tags.contains("active"));
        assert_eq!(derived.activity_state, Some("active"));
    }

    #[test]
    fn curated_values_are_kept() {
        let item = Item::new("x", "Do not fear the night.", "Seneca", "Letters")
            .with_tags(["curated"])
            .with_time_of_day("any");
        let tagged = tag_item(item);
        assert_eq!(tagged.tags.len(), 1);
        assert!(tagged.has_tag("curated"));
        assert_eq!(tagged.preferred_time_of_day.as_deref(), Some("any"));
        // Unset preferences are still filled
        assert_eq!(tagged.preferred_heart_rate_state.as_deref(), Some("elevated"));
    }

    #[test]
    fn untagged_item_gains_tags() {
        let item = Item::new("y", "Begin the morning with effort.", "Marcus", "Meditations");
        let tagged = tag_item(item);
        assert!(tagged.has_tag("morning"));
        assert!(tagged.has_tag("active"));
        assert_eq!(tagged.preferred_time_of_day.as_deref(), Some("morning"));
    }
}
