//! Demo of the monthly factor cache.
//!
//! This example demonstrates how to:
//! - Download the Fama/French research factors into a cache directory
//! - Reuse the artifact for the rest of the month
//! - List and prune artifacts from earlier months
//!
//! Run with: cargo run --example fetch_factors -- [CACHE_DIR]

use famafrench_data::cache::{CacheConfig, DatasetCache, SystemClock};
use famafrench_data::fetch::HttpFetcher;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| ".famafrench".to_string());

    let fetcher = HttpFetcher::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let cache = DatasetCache::new(CacheConfig::new(&dir), fetcher, SystemClock);

    println!("Cache status: {:?}", cache.lookup());
    let table = cache.resolve()?;
    println!("Loaded {} rows from {}", table.len(), cache.artifact_path().display());

    if let (Some(first), Some(last)) = (table.rows().first(), table.rows().last()) {
        println!("  First period: {}", first.period);
        println!("  Last period:  {}", last.period);
    }

    for artifact in cache.list_artifacts()? {
        println!("  artifact {} -> {}", artifact.key, artifact.path.display());
    }
    let removed = cache.prune()?;
    println!("Pruned {} stale artifact(s)", removed.len());

    Ok(())
}
