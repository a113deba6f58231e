use tidemark_core::{CheckpointLayout, Reconciler, ReconciliationResult};
use tracing::info;

use crate::connect::{connect, TargetParams};
use crate::error::RedisResult;

/// Open a dedicated connection to the target and run one reconciliation
/// pass for `source_address`.
///
/// A result with `run_id == "?"` and `offset == -1` means the caller must
/// perform a full resync.
pub async fn load_checkpoint(
    syncer_id: u32,
    source_address: &str,
    target: &TargetParams,
    layout: &CheckpointLayout,
) -> RedisResult<ReconciliationResult> {
    let store = connect(target).await?;

    let result = Reconciler::new(&store, layout)
        .with_syncer_id(syncer_id)
        .reconcile(source_address)
        .await?;

    info!(
        syncer = syncer_id,
        source = source_address,
        run_id = %result.run_id,
        offset = result.offset,
        db = ?result.db,
        "Checkpoint loaded"
    );

    Ok(result)
}
