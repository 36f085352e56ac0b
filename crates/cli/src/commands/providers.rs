//! `stoa providers`: list supported model vendors.

use std::path::Path;
use stoa_core::provider::{ProviderConfig, Vendor};
use stoa_providers::ProviderRegistry;

use super::load_config;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    println!("🤖 Supported Model Vendors");
    println!("==========================");
    println!();

    for vendor in Vendor::ALL {
        let key = if vendor == config.provider.vendor {
            config.provider.api_key.clone()
        } else {
            std::env::var(vendor.credential_env()).ok()
        };
        let configured = key
            .map(|k| ProviderRegistry::is_configured(&ProviderConfig::new(vendor, k)))
            .unwrap_or(false);

        let marker = if vendor == config.provider.vendor && config.provider.enabled {
            " (active)"
        } else {
            ""
        };
        let status = if configured { "✅ key set" } else { "⚠️  no key" };

        println!("  {}{marker}", vendor);
        println!("    default model : {}", vendor.default_model());
        println!("    endpoint      : {}", vendor.default_base_url());
        println!("    credential    : {} ({status})", vendor.credential_env());
        println!(
            "    models        : {}",
            ProviderRegistry::available_models(vendor).join(", ")
        );
        println!();
    }

    println!("  Environment variables:");
    println!("    STOA_VENDOR, STOA_MODEL, STOA_API_KEY");
    println!("    STOA_RETRIEVAL_URL, STOA_RETRIEVAL_KEY");

    Ok(())
}
