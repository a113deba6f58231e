use anyhow::{Context, Result};
use colored::Colorize;

use tidemark_core::{CheckpointRecord, Reconciler, WinnerTracker};
use tidemark_redis::connect;

use crate::config::ProjectConfig;

pub async fn cmd_inspect(config: ProjectConfig, source: Option<&str>) -> Result<()> {
    let target = config.target_params()?;
    let layout = config.layout();

    for syncer in config.syncers(source)? {
        let store = connect(&target)
            .await
            .context("Failed to connect to target")?;

        let records = Reconciler::new(&store, &layout)
            .with_syncer_id(syncer.id)
            .inspect(&syncer.source)
            .await
            .with_context(|| format!("Failed to inspect checkpoints for {}", syncer.source))?;

        println!(
            "\nSyncer {} ({}), key '{}':",
            syncer.id,
            syncer.source,
            layout.key()
        );

        if records.is_empty() {
            println!("  Target holds no data.");
            continue;
        }

        println!(
            "  {:>4} {:<42} {:>15} {:>15}  {}",
            "DB", "Run ID", "Begin", "End", "State"
        );

        let mut tracker = WinnerTracker::new();
        for record in &records {
            tracker.observe(record);
            println!(
                "  {:>4} {:<42} {:>15} {:>15}  {}",
                record.db,
                record.run_id,
                record.offset_begin,
                record.offset_end,
                describe(record)
            );
        }

        let decision = tracker.finish();
        println!("  Next load would: {}", decision);
    }

    println!();
    Ok(())
}

fn describe(record: &CheckpointRecord) -> String {
    if record.is_absent() {
        "absent".dimmed().to_string()
    } else if record.is_consistent() {
        "consistent".green().to_string()
    } else {
        "inconsistent".red().to_string()
    }
}
