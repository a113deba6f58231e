//! Parsing of the `INFO keyspace` section.

use tidemark_core::Keyspace;

use crate::error::{RedisError, RedisResult};

/// Parse `INFO keyspace` output into `db index -> key count`.
///
/// ```text
/// # Keyspace
/// db0:keys=12,expires=0,avg_ttl=0
/// db3:keys=1,expires=1,avg_ttl=4120
/// ```
///
/// Comment lines and lines from other sections are skipped; a malformed
/// `dbN:` line is an error.
pub fn parse_keyspace(info: &str) -> RedisResult<Keyspace> {
    let mut keyspace = Keyspace::new();

    for line in info.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(rest) = line.strip_prefix("db") else {
            continue;
        };

        let (index, stats) = rest
            .split_once(':')
            .ok_or_else(|| RedisError::InvalidKeyspace(line.to_string()))?;

        let db: u32 = index
            .parse()
            .map_err(|_| RedisError::InvalidKeyspace(line.to_string()))?;

        let keys = stats
            .split(',')
            .filter_map(|kv| kv.split_once('='))
            .find(|(k, _)| *k == "keys")
            .and_then(|(_, v)| v.parse::<i64>().ok())
            .ok_or_else(|| RedisError::InvalidKeyspace(line.to_string()))?;

        keyspace.insert(db, keys);
    }

    Ok(keyspace)
}
