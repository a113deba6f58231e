//! Choosing the most advanced consistent checkpoint across databases.

use tracing::{info, warn};

use crate::clean::clear_checkpoint;
use crate::error::Result;
use crate::fetch::fetch_checkpoint;
use crate::keyspace::list_databases;
use crate::layout::CheckpointLayout;
use crate::store::StoreConnection;
use crate::types::{CheckpointRecord, ReconciliationResult, ABSENT_OFFSET};

/// Running maxima over the records visited in one pass.
///
/// The candidate is replaced whenever either maximum advances, so it may end
/// up being a record whose own pair disagrees. Consistency is decided on the
/// maxima alone.
#[derive(Debug, Clone)]
pub struct WinnerTracker {
    max_begin: i64,
    max_end: i64,
    candidate: Option<(String, u32)>,
}

impl Default for WinnerTracker {
    fn default() -> Self {
        Self {
            max_begin: ABSENT_OFFSET,
            max_end: ABSENT_OFFSET,
            candidate: None,
        }
    }
}

impl WinnerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: &CheckpointRecord) {
        let begin_advanced = record.offset_begin > self.max_begin;
        let end_advanced = record.offset_end > self.max_end;

        if begin_advanced {
            self.max_begin = record.offset_begin;
        }
        if end_advanced {
            self.max_end = record.offset_end;
        }
        if begin_advanced || end_advanced {
            self.candidate = Some((record.run_id.clone(), record.db));
        }
    }

    pub fn max_begin(&self) -> i64 {
        self.max_begin
    }

    pub fn max_end(&self) -> i64 {
        self.max_end
    }

    /// The decision for the records observed so far.
    pub fn finish(&self) -> ReconciliationResult {
        match self.candidate {
            Some((ref run_id, db)) if self.max_begin == self.max_end => ReconciliationResult {
                run_id: run_id.clone(),
                offset: self.max_begin,
                db: Some(db),
            },
            _ => ReconciliationResult::full_resync(),
        }
    }
}

/// Runs reconciliation passes over one store connection.
pub struct Reconciler<'a, C> {
    conn: &'a C,
    layout: &'a CheckpointLayout,
    syncer_id: u32,
}

impl<'a, C: StoreConnection> Reconciler<'a, C> {
    pub fn new(conn: &'a C, layout: &'a CheckpointLayout) -> Self {
        Self {
            conn,
            layout,
            syncer_id: 0,
        }
    }

    /// Tag log lines with the syncer this pass belongs to.
    pub fn with_syncer_id(mut self, syncer_id: u32) -> Self {
        self.syncer_id = syncer_id;
        self
    }

    /// Read every database's record for `source` without modifying anything.
    pub async fn inspect(&self, source: &str) -> Result<Vec<CheckpointRecord>> {
        let databases = list_databases(self.conn).await?;

        let mut records = Vec::with_capacity(databases.len());
        for &db in databases.keys() {
            records.push(fetch_checkpoint(self.conn, self.layout, db, source).await?);
        }
        Ok(records)
    }

    /// Locate the most advanced consistent checkpoint for `source` and remove
    /// the checkpoint fields of every other database.
    ///
    /// Store and parse failures abort the pass. Cleanup failures are logged
    /// and do not change the result.
    pub async fn reconcile(&self, source: &str) -> Result<ReconciliationResult> {
        let syncer = self.syncer_id;

        let databases = list_databases(self.conn).await?;
        if databases.is_empty() {
            info!(syncer, source, "No logical databases found, need full sync");
            return Ok(ReconciliationResult::full_resync());
        }

        let mut tracker = WinnerTracker::new();
        for &db in databases.keys() {
            info!(syncer, db, "Load checkpoint check db");
            let record = fetch_checkpoint(self.conn, self.layout, db, source).await?;

            tracker.observe(&record);

            if record.offset_begin != record.offset_end {
                warn!(
                    syncer,
                    db,
                    offset_begin = record.offset_begin,
                    offset_end = record.offset_end,
                    "Checkpoint offsets disagree"
                );
            }
        }

        let result = tracker.finish();
        info!(
            syncer,
            max_begin = tracker.max_begin(),
            max_end = tracker.max_end(),
            record_db = ?result.db,
            "Checkpoint maxima computed"
        );

        if result.needs_full_resync() {
            warn!(syncer, source, "Offset check failed, need full sync");
        }

        if let Err(e) =
            clear_checkpoint(self.conn, self.layout, result.db, &databases, source).await
        {
            warn!(syncer, error = %e, "Clear old checkpoint failed");
        }

        Ok(result)
    }
}
