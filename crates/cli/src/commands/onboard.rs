//! `stoa onboard`: first-time setup.

use std::path::Path;
use stoa_config::AppConfig;

use super::config_file;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_file(config_path);

    println!("🏛️  Stoa — First-Time Setup");
    println!("==========================\n");

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if path.exists() {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Created config at: {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Run `stoa select --heart-rate 72` (local tier works out of the box)");
    println!("   2. Set [provider] enabled = true and a key to add a model tier");
    println!("   3. Set [retrieval] enabled = true and an endpoint to add semantic search\n");

    Ok(())
}
