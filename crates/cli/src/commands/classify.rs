//! `stoa classify`: show the derived context as JSON.

use super::SignalArgs;

pub async fn run(signals: &SignalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let context = signals.context();
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
