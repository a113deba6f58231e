use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod env;

use cli::{Cli, Commands};
use commands::{cmd_clear, cmd_init, cmd_inspect, cmd_load};
use config::ProjectConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (searches current dir and ancestors)
    env::load_dotenv_from_ancestors()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tidemark=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cmd_init(),
        Commands::Load { source, json } => {
            let config = ProjectConfig::load(&cli.config)?;
            cmd_load(config, source.as_deref(), json).await
        }
        Commands::Inspect { source } => {
            let config = ProjectConfig::load(&cli.config)?;
            cmd_inspect(config, source.as_deref()).await
        }
        Commands::Clear { source, yes } => {
            let config = ProjectConfig::load(&cli.config)?;
            cmd_clear(config, source.as_deref(), yes).await
        }
    }
}
