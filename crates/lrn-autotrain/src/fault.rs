use lrn_pg::RegistryError;
use lrn_replay::IngestError;
use lrn_replay::SnapshotError;
use lrn_store::TransferError;

/// Why an episode stopped. The loop does not retry; `run` returns the fault.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error("listing new units failed: {0}")]
    Listing(#[source] TransferError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
