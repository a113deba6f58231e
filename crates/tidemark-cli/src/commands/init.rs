use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tracing::info;

const ENV_EXAMPLE: &str = r#"# Tidemark environment variables
# Copy this file to .env and fill in your values

# Password of the target Redis (leave empty if the target has no auth)
TIDEMARK_TARGET_PASSWORD=
"#;

const CONFIG_TEMPLATE: &str = r#"# Tidemark configuration
# Secrets are loaded from .env file

[target]
addresses = ["127.0.0.1:6379"]
# "auth" or "adminauth"
auth_type = "auth"
password = "${TIDEMARK_TARGET_PASSWORD}"
tls = false

[checkpoint]
# Hash key holding checkpoint fields in every logical database
key = "tidemark-checkpoint"

# One entry per upstream; the syncer id is the entry's position
[[sources]]
address = "10.0.0.1:6379"
"#;

pub fn cmd_init() -> Result<()> {
    println!("Initializing tidemark in current directory...\n");

    let env_example_path = Path::new(".env.example");
    if !env_example_path.exists() {
        fs::write(env_example_path, ENV_EXAMPLE)?;
        println!("Created .env.example");
    } else {
        println!(".env.example already exists, skipping");
    }

    let config_path = Path::new("tidemark.toml");
    if !config_path.exists() {
        fs::write(config_path, CONFIG_TEMPLATE)?;
        info!(path = %config_path.display(), "Created config");
        println!("Created tidemark.toml");
    } else {
        println!("tidemark.toml already exists, skipping");
    }

    // Keep secrets out of version control
    let root_gitignore = Path::new(".gitignore");
    if root_gitignore.exists() {
        let content = fs::read_to_string(root_gitignore)?;
        if !content.lines().any(|l| l.trim() == ".env") {
            let mut file = fs::OpenOptions::new().append(true).open(root_gitignore)?;
            writeln!(file, "\n# Tidemark secrets\n.env")?;
            println!("Added .env to .gitignore");
        }
    } else {
        fs::write(root_gitignore, "# Tidemark secrets\n.env\n")?;
        println!("Created .gitignore with .env");
    }

    println!("\n{}", "Done!".green());
    println!("Next: fill in .env, list your sources in tidemark.toml, then run 'tidemark inspect'.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    use crate::config::ProjectConfig;

    #[test]
    #[serial]
    fn test_init_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        cmd_init().unwrap();

        assert!(temp_dir.path().join(".env.example").exists());
        let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains(".env"));

        let config = ProjectConfig::load(&temp_dir.path().join("tidemark.toml")).unwrap();
        assert_eq!(config.layout().key(), "tidemark-checkpoint");
        assert_eq!(config.sources.len(), 1);

        // Running again leaves existing files alone
        fs::write(temp_dir.path().join("tidemark.toml"), "# custom").unwrap();
        cmd_init().unwrap();
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("tidemark.toml")).unwrap(),
            "# custom"
        );
        let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore.matches(".env").count(), 1);

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_init_appends_to_existing_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".gitignore"), "target/\n").unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        cmd_init().unwrap();

        let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.starts_with("target/\n"));
        assert!(gitignore.lines().any(|l| l == ".env"));

        std::env::set_current_dir(original_dir).unwrap();
    }
}
