use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Run id reported when no consistent checkpoint is known.
pub const UNKNOWN_RUN_ID: &str = "?";

/// Offset reported when a checkpoint offset was never written.
pub const ABSENT_OFFSET: i64 = -1;

/// Logical databases holding data, mapped to the store's size hint.
///
/// Only the key set matters for reconciliation. A `BTreeMap` keeps the
/// visiting order ascending so repeated passes behave identically.
pub type Keyspace = BTreeMap<u32, i64>;

/// Checkpoint state for one (database, source) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRecord {
    /// Producer run that last wrote this checkpoint, or `"?"`.
    pub run_id: String,
    /// Offset recorded when the last checkpoint write started.
    pub offset_begin: i64,
    /// Offset recorded when the last checkpoint write finished.
    pub offset_end: i64,
    /// Logical database the record was read from.
    pub db: u32,
}

impl CheckpointRecord {
    /// A record with every field at its sentinel.
    pub fn absent(db: u32) -> Self {
        Self {
            run_id: UNKNOWN_RUN_ID.to_string(),
            offset_begin: ABSENT_OFFSET,
            offset_end: ABSENT_OFFSET,
            db,
        }
    }

    /// Both offsets were written and agree.
    pub fn is_consistent(&self) -> bool {
        self.offset_begin == self.offset_end && self.offset_begin != ABSENT_OFFSET
    }

    pub fn is_absent(&self) -> bool {
        self.offset_begin == ABSENT_OFFSET && self.offset_end == ABSENT_OFFSET
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub run_id: String,
    pub offset: i64,
    pub db: Option<u32>,
}

impl ReconciliationResult {
    /// No consistent checkpoint: the caller must perform a full resync.
    pub fn full_resync() -> Self {
        Self {
            run_id: UNKNOWN_RUN_ID.to_string(),
            offset: ABSENT_OFFSET,
            db: None,
        }
    }

    pub fn needs_full_resync(&self) -> bool {
        self.db.is_none()
    }
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.db {
            Some(db) => write!(
                f,
                "resume run_id={} offset={} db={}",
                self.run_id, self.offset, db
            ),
            None => write!(f, "full resync"),
        }
    }
}
