//! Reading one database's checkpoint for one source.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::{CheckpointField, CheckpointLayout};
use crate::store::StoreConnection;
use crate::types::CheckpointRecord;

/// Fetch the checkpoint for `source` from logical database `db`.
///
/// Leaves `db` selected on the connection. A missing key or missing fields
/// yield sentinel values; a malformed offset is an error.
pub async fn fetch_checkpoint<C: StoreConnection>(
    conn: &C,
    layout: &CheckpointLayout,
    db: u32,
    source: &str,
) -> Result<CheckpointRecord> {
    conn.select_database(db)
        .await
        .map_err(|e| Error::StoreSelect { db, source: e })?;

    let exists = conn
        .exists(layout.key())
        .await
        .map_err(|e| Error::query(format!("exists {} in db[{}]", layout.key(), db), e))?;

    if !exists {
        debug!(db, key = %layout.key(), "No checkpoint key");
        return Ok(CheckpointRecord::absent(db));
    }

    let fields = conn
        .get_all_fields(layout.key())
        .await
        .map_err(|e| Error::query(format!("read {} in db[{}]", layout.key(), db), e))?;

    parse_checkpoint(layout, db, source, &fields)
}

/// Decode the fields scoped to `source` into a typed record.
pub fn parse_checkpoint(
    layout: &CheckpointLayout,
    db: u32,
    source: &str,
    fields: &HashMap<String, Vec<u8>>,
) -> Result<CheckpointRecord> {
    let mut record = CheckpointRecord::absent(db);

    for (name, value) in fields {
        match layout.classify(source, name) {
            Some(CheckpointField::RunId) => {
                record.run_id = String::from_utf8_lossy(value).into_owned();
            }
            Some(CheckpointField::OffsetBegin) => {
                record.offset_begin = parse_offset(db, name, value)?;
            }
            Some(CheckpointField::OffsetEnd) => {
                record.offset_end = parse_offset(db, name, value)?;
            }
            None => {}
        }
    }

    Ok(record)
}

fn parse_offset(db: u32, field: &str, value: &[u8]) -> Result<i64> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::CheckpointCorrupt {
            db,
            field: field.to_string(),
            value: String::from_utf8_lossy(value).into_owned(),
        })
}
