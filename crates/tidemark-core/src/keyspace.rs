use tracing::debug;

use crate::error::{Error, Result};
use crate::store::StoreConnection;
use crate::types::Keyspace;

/// List the logical databases currently holding data.
///
/// An empty keyspace is valid: no database was ever written.
pub async fn list_databases<C: StoreConnection>(conn: &C) -> Result<Keyspace> {
    let keyspace = conn
        .list_keyspace_info()
        .await
        .map_err(|e| Error::query("list keyspace", e))?;

    debug!(databases = keyspace.len(), "Enumerated logical databases");
    Ok(keyspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStore;

    #[tokio::test]
    async fn test_list_databases_empty() {
        let store = MockStore::new();
        assert!(list_databases(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_databases() {
        let store = MockStore::new();
        store.set_string(0, "a", "1");
        store.set_string(3, "b", "1");

        let keyspace = list_databases(&store).await.unwrap();
        assert_eq!(keyspace.keys().copied().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_list_databases_failure() {
        let store = MockStore::new();
        store.fail_keyspace("ERR unknown section");

        let err = list_databases(&store).await.unwrap_err();
        assert!(matches!(err, Error::StoreQuery { .. }));
    }
}
