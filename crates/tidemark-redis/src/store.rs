use std::collections::HashMap;
use std::future::Future;

use redis::aio::MultiplexedConnection;
use tidemark_core::{Keyspace, StoreConnection, StoreResult};
use tracing::debug;

use crate::error::RedisError;
use crate::keyspace::parse_keyspace;

/// [`StoreConnection`] backed by a single Redis connection.
///
/// Clones share the underlying connection and therefore its selected
/// database.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

/// Collect `HGETALL` pairs, dropping fields whose names are not UTF-8.
///
/// Such names can never match a source's checkpoint fields.
fn field_map(key: &str, pairs: Vec<(Vec<u8>, Vec<u8>)>) -> HashMap<String, Vec<u8>> {
    let mut fields = HashMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        match String::from_utf8(name) {
            Ok(name) => {
                fields.insert(name, value);
            }
            Err(e) => debug!(key, field = ?e.as_bytes(), "Skipping non-UTF-8 field"),
        }
    }
    fields
}

impl StoreConnection for RedisStore {
    fn select_database(&self, db: u32) -> impl Future<Output = StoreResult<()>> + Send {
        let mut conn = self.conn.clone();
        async move {
            let _: () = redis::cmd("SELECT")
                .arg(db)
                .query_async(&mut conn)
                .await
                .map_err(RedisError::from)?;
            Ok(())
        }
    }

    fn exists(&self, key: &str) -> impl Future<Output = StoreResult<bool>> + Send {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        async move {
            let exists: bool = redis::cmd("EXISTS")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .map_err(RedisError::from)?;
            Ok(exists)
        }
    }

    fn get_all_fields(
        &self,
        key: &str,
    ) -> impl Future<Output = StoreResult<HashMap<String, Vec<u8>>>> + Send {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        async move {
            let pairs: Vec<(Vec<u8>, Vec<u8>)> = redis::cmd("HGETALL")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .map_err(RedisError::from)?;
            Ok(field_map(&key, pairs))
        }
    }

    fn delete_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> impl Future<Output = StoreResult<u64>> + Send {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        let fields = fields.to_vec();
        async move {
            if fields.is_empty() {
                return Ok(0);
            }
            let removed: u64 = redis::cmd("HDEL")
                .arg(&key)
                .arg(&fields)
                .query_async(&mut conn)
                .await
                .map_err(RedisError::from)?;
            Ok(removed)
        }
    }

    fn list_keyspace_info(&self) -> impl Future<Output = StoreResult<Keyspace>> + Send {
        let mut conn = self.conn.clone();
        async move {
            let info: String = redis::cmd("INFO")
                .arg("keyspace")
                .query_async(&mut conn)
                .await
                .map_err(RedisError::from)?;
            Ok(parse_keyspace(&info)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::Value;

    fn bulk(bytes: &[u8]) -> Value {
        Value::BulkString(bytes.to_vec())
    }

    #[test]
    fn test_field_map_skips_non_utf8_names() {
        let reply = Value::Array(vec![
            bulk(b"10.0.0.1:6379-offset-begin"),
            bulk(b"9"),
            bulk(&[0xff, 0xfe, b'x']),
            bulk(b"1"),
        ]);
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = redis::from_redis_value(&reply).unwrap();

        let fields = field_map("tidemark-checkpoint", pairs);
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields.get("10.0.0.1:6379-offset-begin").map(Vec::as_slice),
            Some(&b"9"[..])
        );
    }

    #[test]
    fn test_field_map_keeps_binary_values() {
        let reply = Value::Array(vec![bulk(b"src-run-id"), bulk(&[0xff, 0x00])]);
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = redis::from_redis_value(&reply).unwrap();

        let fields = field_map("ckpt", pairs);
        assert_eq!(fields["src-run-id"], vec![0xff, 0x00]);
    }
}
