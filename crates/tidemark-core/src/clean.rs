use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::CheckpointLayout;
use crate::store::StoreConnection;
use crate::types::Keyspace;

/// Remove the checkpoint fields of `source` from every database in
/// `databases` except `survivor`. Pass `None` to wipe all of them.
///
/// Returns the number of fields that actually existed. Stops at the first
/// database that fails; the remaining ones are left for the next pass.
pub async fn clear_checkpoint<C: StoreConnection>(
    conn: &C,
    layout: &CheckpointLayout,
    survivor: Option<u32>,
    databases: &Keyspace,
    source: &str,
) -> Result<u64> {
    let fields = layout.field_names(source);
    let mut removed = 0;

    for &db in databases.keys() {
        if Some(db) == survivor {
            continue;
        }

        conn.select_database(db)
            .await
            .map_err(|e| Error::StoreSelect { db, source: e })?;

        let count = conn
            .delete_fields(layout.key(), &fields)
            .await
            .map_err(|e| Error::StoreWrite { db, source: e })?;

        debug!(db, key = %layout.key(), fields = ?fields, count, "Removed checkpoint fields");
        info!(db, source, "Cleared checkpoint of logical db");
        removed += count;
    }

    Ok(removed)
}
