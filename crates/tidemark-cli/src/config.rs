use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use tidemark_core::{CheckpointLayout, DEFAULT_CHECKPOINT_KEY};
use tidemark_redis::TargetParams;

/// Project configuration from tidemark.toml
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub target: TargetParams,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_checkpoint_key")]
    pub key: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            key: default_checkpoint_key(),
        }
    }
}

fn default_checkpoint_key() -> String {
    DEFAULT_CHECKPOINT_KEY.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub address: String,
}

/// A configured source together with the syncer id it reconciles under.
#[derive(Debug, Clone)]
pub struct Syncer {
    pub id: u32,
    pub source: String,
}

impl ProjectConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ProjectConfig =
            toml::from_str(&content).with_context(|| "Failed to parse tidemark.toml")?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.target.addresses.is_empty() {
            anyhow::bail!("[target] addresses must not be empty");
        }
        if self.checkpoint.key.trim().is_empty() {
            anyhow::bail!("[checkpoint] key must not be empty");
        }
        if self.sources.is_empty() {
            anyhow::bail!("At least one [[sources]] entry is required");
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.address.trim().is_empty() {
                anyhow::bail!("[[sources]] address must not be empty");
            }
            if !seen.insert(source.address.as_str()) {
                anyhow::bail!("Duplicate source address: {}", source.address);
            }
        }

        Ok(())
    }

    /// Resolve environment variables in a string.
    /// Supports ${VAR_NAME} syntax.
    pub fn resolve_env(&self, s: &str) -> Result<String> {
        let mut result = s.to_string();

        // Find all ${...} patterns
        while let Some(start) = result.find("${") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 2..start + end];
                let value = std::env::var(var_name).with_context(|| {
                    format!("Environment variable {} is not set", var_name)
                })?;
                result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
            } else {
                break;
            }
        }

        Ok(result)
    }

    /// Target parameters with the password resolved.
    pub fn target_params(&self) -> Result<TargetParams> {
        let mut params = self.target.clone();
        params.password = match &self.target.password {
            Some(p) => Some(self.resolve_env(p)?),
            None => None,
        };
        Ok(params)
    }

    pub fn layout(&self) -> CheckpointLayout {
        CheckpointLayout::new(self.checkpoint.key.clone())
    }

    /// Configured sources, optionally narrowed to one address. Syncer ids are
    /// positions in the config file and stay stable under filtering.
    pub fn syncers(&self, only: Option<&str>) -> Result<Vec<Syncer>> {
        let syncers: Vec<Syncer> = self
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| only.map_or(true, |addr| s.address == addr))
            .map(|(i, s)| Syncer {
                id: i as u32,
                source: s.address.clone(),
            })
            .collect();

        if syncers.is_empty() {
            if let Some(addr) = only {
                anyhow::bail!("Source {} is not configured in tidemark.toml", addr);
            }
        }

        Ok(syncers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tidemark_redis::AuthType;

    const SAMPLE: &str = r#"
[target]
addresses = ["127.0.0.1:6379"]
auth_type = "adminauth"
password = "${TIDEMARK_TEST_PASSWORD}"

[checkpoint]
key = "shake-ckpt"

[[sources]]
address = "10.0.0.1:6379"

[[sources]]
address = "10.0.0.2:6379"
"#;

    fn parse(content: &str) -> Result<ProjectConfig> {
        let config: ProjectConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_parse_sample() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.target.addresses, vec!["127.0.0.1:6379"]);
        assert_eq!(config.target.auth_type, AuthType::AdminAuth);
        assert!(!config.target.tls);
        assert!(!config.target.cluster);
        assert_eq!(config.layout().key(), "shake-ckpt");
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_checkpoint_key_defaults() {
        let config = parse(
            r#"
[target]
addresses = ["127.0.0.1:6379"]

[[sources]]
address = "10.0.0.1:6379"
"#,
        )
        .unwrap();
        assert_eq!(config.layout().key(), "tidemark-checkpoint");
        assert_eq!(config.target.auth_type, AuthType::Auth);
        assert!(config.target.password.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let no_sources = r#"
[target]
addresses = ["127.0.0.1:6379"]
"#;
        assert!(parse(no_sources).is_err());

        let no_addresses = r#"
[target]
addresses = []

[[sources]]
address = "10.0.0.1:6379"
"#;
        assert!(parse(no_addresses).is_err());

        let duplicate = r#"
[target]
addresses = ["127.0.0.1:6379"]

[[sources]]
address = "10.0.0.1:6379"

[[sources]]
address = "10.0.0.1:6379"
"#;
        let err = parse(duplicate).unwrap_err().to_string();
        assert!(err.contains("Duplicate source"));

        let empty_key = r#"
[target]
addresses = ["127.0.0.1:6379"]

[checkpoint]
key = ""

[[sources]]
address = "10.0.0.1:6379"
"#;
        assert!(parse(empty_key).is_err());
    }

    #[test]
    fn test_syncers() {
        let config = parse(SAMPLE).unwrap();

        let all = config.syncers(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, 1);
        assert_eq!(all[1].source, "10.0.0.2:6379");

        let one = config.syncers(Some("10.0.0.2:6379")).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, 1);

        assert!(config.syncers(Some("10.9.9.9:6379")).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_env() {
        std::env::set_var("TIDEMARK_TEST_VAR", "hello");
        let config = parse(SAMPLE).unwrap();

        assert_eq!(config.resolve_env("${TIDEMARK_TEST_VAR}").unwrap(), "hello");
        assert_eq!(
            config.resolve_env("prefix_${TIDEMARK_TEST_VAR}_suffix").unwrap(),
            "prefix_hello_suffix"
        );
        assert_eq!(config.resolve_env("no_vars").unwrap(), "no_vars");

        std::env::remove_var("TIDEMARK_TEST_VAR");
        assert!(config.resolve_env("${TIDEMARK_TEST_VAR}").is_err());
    }

    #[test]
    #[serial]
    fn test_target_params_resolves_password() {
        std::env::set_var("TIDEMARK_TEST_PASSWORD", "s3cret");
        let config = parse(SAMPLE).unwrap();

        let params = config.target_params().unwrap();
        assert_eq!(params.password.as_deref(), Some("s3cret"));
        assert_eq!(params.addresses, config.target.addresses);

        std::env::remove_var("TIDEMARK_TEST_PASSWORD");
        assert!(config.target_params().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config.sources[0].address, "10.0.0.1:6379");

        assert!(ProjectConfig::load(Path::new("/nonexistent/tidemark.toml")).is_err());
    }
}
