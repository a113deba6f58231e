use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use tidemark_core::ReconciliationResult;
use tidemark_redis::load_checkpoint;

use crate::config::{ProjectConfig, Syncer};

pub async fn cmd_load(config: ProjectConfig, source: Option<&str>, json: bool) -> Result<()> {
    let target = config.target_params()?;
    let layout = config.layout();
    let syncers = config.syncers(source)?;

    // Each source gets its own connection; database selection is per connection.
    let mut results = Vec::with_capacity(syncers.len());
    for syncer in syncers {
        info!(syncer = syncer.id, source = %syncer.source, "Loading checkpoint");
        let result = load_checkpoint(syncer.id, &syncer.source, &target, &layout)
            .await
            .with_context(|| format!("Failed to load checkpoint for {}", syncer.source))?;
        results.push((syncer, result));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&results))?);
    } else {
        print_table(&results);
    }

    Ok(())
}

#[derive(Serialize)]
struct LoadRow<'a> {
    syncer: u32,
    source: &'a str,
    #[serde(flatten)]
    result: &'a ReconciliationResult,
    full_resync: bool,
}

fn to_json(results: &[(Syncer, ReconciliationResult)]) -> Vec<LoadRow<'_>> {
    results
        .iter()
        .map(|(syncer, result)| LoadRow {
            syncer: syncer.id,
            source: &syncer.source,
            result,
            full_resync: result.needs_full_resync(),
        })
        .collect()
}

fn print_table(results: &[(Syncer, ReconciliationResult)]) {
    println!("\nCheckpoints:");
    println!(
        "{:<8} {:<28} {:<42} {:>15} {:>4}",
        "Syncer", "Source", "Run ID", "Offset", "DB"
    );
    println!("{:-<101}", "");

    for (syncer, result) in results {
        match result.db {
            Some(db) => println!(
                "{:<8} {:<28} {:<42} {:>15} {:>4}",
                syncer.id, syncer.source, result.run_id, result.offset, db
            ),
            None => println!(
                "{:<8} {:<28} {}",
                syncer.id,
                syncer.source,
                "no consistent checkpoint, full resync required".yellow()
            ),
        }
    }

    println!();
}
