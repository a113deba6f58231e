pub mod clean;
pub mod error;
pub mod fetch;
pub mod keyspace;
pub mod layout;
mod mock;
pub mod reconcile;
pub mod store;
pub mod types;

pub use clean::clear_checkpoint;
pub use error::{Error, Result, StoreError, StoreResult};
pub use fetch::{fetch_checkpoint, parse_checkpoint};
pub use keyspace::list_databases;
pub use layout::{CheckpointField, CheckpointLayout, DEFAULT_CHECKPOINT_KEY};
pub use mock::MockStore;
pub use reconcile::{Reconciler, WinnerTracker};
pub use store::StoreConnection;
pub use types::{CheckpointRecord, Keyspace, ReconciliationResult, ABSENT_OFFSET, UNKNOWN_RUN_ID};
