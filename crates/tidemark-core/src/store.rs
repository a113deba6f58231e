use std::collections::HashMap;
use std::future::Future;

use crate::error::StoreResult;
use crate::types::Keyspace;

/// Operations the reconciler needs from a target store connection.
///
/// The active database is connection-scoped state: callers select a
/// database explicitly before every key operation and must not share one
/// connection between concurrent passes.
pub trait StoreConnection: Send + Sync {
    /// Switch the active logical database.
    fn select_database(&self, db: u32) -> impl Future<Output = StoreResult<()>> + Send;

    /// Check whether `key` exists in the active database.
    fn exists(&self, key: &str) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Read every field of the hash stored at `key`.
    fn get_all_fields(
        &self,
        key: &str,
    ) -> impl Future<Output = StoreResult<HashMap<String, Vec<u8>>>> + Send;

    /// Delete hash fields, returning how many existed. Missing fields are not an error.
    fn delete_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Logical databases that currently hold keys.
    fn list_keyspace_info(&self) -> impl Future<Output = StoreResult<Keyspace>> + Send;
}
