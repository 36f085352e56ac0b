//! The shared selection prompt and the parser for the model's answer.
//!
//! Every vendor adapter sends the same instruction and candidate list and
//! expects a bare item id back. Only categorical context goes into the
//! prompt; raw readings stay on the device.

use stoa_core::context::Context;
use stoa_core::error::SelectError;
use stoa_core::item::Item;

/// Characters of item text shown per candidate.
const CANDIDATE_PREVIEW_CHARS: usize = 160;

pub const SYSTEM_INSTRUCTION: &str = "You choose one passage of Stoic wisdom for a person \
based on how they are doing right now. Reply with the id of exactly one candidate and \
nothing else.";

/// Render the user turn: context summary, candidate list, answer format.
pub fn build_prompt(context: &Context, candidates: &[Item]) -> String {
    let mut prompt = String::with_capacity(256 + candidates.len() * 200);

    prompt.push_str("Current context:\n");
    prompt.push_str(&format!("- stress level: {}\n", context.stress_level));
    prompt.push_str(&format!("- time of day: {}\n", context.time_of_day));
    prompt.push_str(&format!(
        "- physically active: {}\n",
        if context.is_active { "yes" } else { "no" }
    ));
    prompt.push_str(&format!("- primary need: {}\n", context.primary_tag));

    prompt.push_str("\nCandidates:\n");
    for item in candidates {
        prompt.push_str(&format!(
            "[{}] {}",
            item.id,
            item.summary(CANDIDATE_PREVIEW_CHARS)
        ));
        if !item.tags.is_empty() {
            let tags: Vec<&str> = item.tags.iter().map(String::as_str).collect();
            prompt.push_str(&format!(" (tags: {})", tags.join(", ")));
        }
        prompt.push('\n');
    }

    prompt.push_str("\nAnswer with the id inside the brackets of the single best candidate.");
    prompt
}

/// Resolve the model's reply to one of `candidates`.
///
/// Surrounding whitespace, quotes, backticks and brackets are stripped; what
/// remains must equal a candidate id exactly.
pub fn match_candidate(reply: &str, candidates: &[Item]) -> Result<Item, SelectError> {
    let id = reply
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '[' | ']'))
        .trim();

    if id.is_empty() {
        return Err(SelectError::MalformedResponse("empty reply".into()));
    }

    candidates
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .ok_or_else(|| {
            let reply = truncate(id);
            SelectError::MalformedResponse(format!("reply '{reply}' is not a candidate id"))
        })
}

fn truncate(text: &str) -> String {
    text.chars().take(80).collect()
}
