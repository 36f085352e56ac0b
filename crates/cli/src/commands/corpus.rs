//! `stoa corpus`: summarize the active corpus.

use std::collections::BTreeMap;
use std::path::Path;
use stoa_corpus::Corpus;

use super::load_config;

pub async fn run(config_path: Option<&Path>, list: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let corpus = Corpus::open(config.corpus.path.as_deref(), config.corpus.auto_tag)?;

    let source = match &config.corpus.path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };

    println!("📚 Corpus: {source}");
    let auto_tag = if config.corpus.auto_tag { "on" } else { "off" };
    println!("   {} items, auto-tag {auto_tag}", corpus.len());
    println!();

    let mut authors: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &corpus {
        *authors.entry(item.attribution.as_str()).or_insert(0) += 1;
    }
    println!("  By author:");
    for (author, count) in &authors {
        println!("    {author:<20} {count}");
    }
    println!();

    println!("  By tag:");
    for (tag, count) in corpus.tag_histogram() {
        println!("    {tag:<20} {count}");
    }

    if list {
        println!();
        println!("  Items:");
        for item in &corpus {
            println!("    {:<24} {}", item.id, item.summary(60));
        }
    }

    Ok(())
}
