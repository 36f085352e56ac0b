//! `stoa doctor`: diagnose configuration, corpus and retrieval health.

use std::path::Path;
use std::time::Duration;
use stoa_core::ItemSelector;
use stoa_corpus::Corpus;
use stoa_providers::{ProviderRegistry, RetrievalClient};

use super::{config_file, load_config};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Stoa Doctor — System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let path = config_file(config_path);
    if !path.exists() {
        println!(
            "  ⚠️  No config file at {} — using defaults (run `stoa onboard`)",
            path.display()
        );
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    match Corpus::open(config.corpus.path.as_deref(), config.corpus.auto_tag) {
        Ok(corpus) => println!("  ✅ Corpus loaded ({} items)", corpus.len()),
        Err(e) => {
            println!("  ❌ Corpus failed to load: {e}");
            issues += 1;
        }
    }

    if config.provider.enabled {
        let provider = config.provider_config();
        let registry = ProviderRegistry::new(Duration::from_secs(config.provider.timeout_secs));
        match registry.resolve(&provider) {
            Ok(client) => match client.probe().await {
                Ok(true) => {
                    println!("  ✅ Provider {} ({})", client.name(), provider.model_id)
                }
                Ok(false) => {
                    println!("  ⚠️  Provider {} rejected the health check", client.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider {} unreachable: {e}", client.name());
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Provider: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ➖ Provider tier disabled");
    }

    if config.retrieval.enabled {
        match config.retrieval.endpoint.as_deref() {
            Some(endpoint) => {
                let timeout = Duration::from_secs(config.retrieval.timeout_secs);
                let client =
                    RetrievalClient::new(endpoint, config.retrieval.api_key.clone(), timeout);
                match client.probe().await {
                    Ok(true) => println!("  ✅ Retrieval healthy at {endpoint}"),
                    Ok(false) => {
                        println!("  ⚠️  Retrieval at {endpoint} reported unhealthy");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ❌ Retrieval unreachable: {e}");
                        issues += 1;
                    }
                }
            }
            None => {
                println!("  ❌ Retrieval enabled but retrieval.endpoint is not set");
                issues += 1;
            }
        }
    } else {
        println!("  ➖ Retrieval tier disabled");
    }

    println!();
    if issues == 0 {
        println!(
            "  🎉 All checks passed! Selections fall back to the local tier when remote tiers fail."
        );
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
