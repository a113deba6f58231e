use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;

use tidemark_core::{clear_checkpoint, list_databases};
use tidemark_redis::connect;

use crate::config::ProjectConfig;

pub async fn cmd_clear(config: ProjectConfig, source: Option<&str>, yes: bool) -> Result<()> {
    let target = config.target_params()?;
    let layout = config.layout();
    let syncers = config.syncers(source)?;

    println!("{}", "WARNING: Dangerous Operation".red().bold());
    println!();
    println!(
        "This will remove checkpoint fields under '{}' in every logical database for:",
        layout.key()
    );
    for syncer in &syncers {
        println!("  • {}", syncer.source);
    }
    println!();
    println!(
        "{}",
        "The next synchronization of these sources will perform a full resync.".red()
    );
    println!();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Remove these checkpoints?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Aborting.");
            return Ok(());
        }
    }

    for syncer in &syncers {
        let store = connect(&target)
            .await
            .context("Failed to connect to target")?;

        let databases = list_databases(&store).await?;
        let removed = clear_checkpoint(&store, &layout, None, &databases, &syncer.source)
            .await
            .with_context(|| format!("Failed to clear checkpoint for {}", syncer.source))?;

        println!(
            "  ✓ {}: removed {} field(s) across {} database(s)",
            syncer.source,
            removed,
            databases.len()
        );
    }

    println!("\n{}", "Checkpoints cleared.".green());
    Ok(())
}
