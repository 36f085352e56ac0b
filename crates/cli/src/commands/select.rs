//! `stoa select`: pick one passage for the given readings.

use std::path::Path;
use stoa_engine::Orchestrator;
use tracing::debug;

use super::{SignalArgs, load_config};

pub async fn run(
    config_path: Option<&Path>,
    signals: &SignalArgs,
    local_only: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if local_only {
        config.retrieval.enabled = false;
        config.provider.enabled = false;
    }

    let orchestrator = Orchestrator::from_config(&config)?;
    let context = signals.context();
    debug!(
        stress = %context.stress_level,
        time_of_day = %context.time_of_day,
        primary_tag = %context.primary_tag,
        "Classified readings"
    );
    let result = orchestrator.select(&context).await?;

    if json {
        let output = serde_json::json!({
            "context": context,
            "item": result.item,
            "served_by": result.served_by,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let item = &result.item;
    println!();
    println!("  \u{201c}{}\u{201d}", item.text);
    println!("      — {}, {}", item.attribution, item.source);
    println!();
    println!(
        "  ({} · {} · served by {})",
        context.stress_level, context.time_of_day, result.served_by
    );

    Ok(())
}
