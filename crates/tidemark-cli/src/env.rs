use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// Load the closest .env file, searching from the current working directory
/// up to the filesystem root. Returns the loaded path, or `None` when no
/// .env file exists.
pub fn load_dotenv_from_ancestors() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    let mut current = cwd.as_path();
    loop {
        let env_path = current.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("Failed to load .env from {}", env_path.display()))?;
            debug!("Loaded .env from {}", env_path.display());
            return Ok(Some(env_path));
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    Ok(None)
}
