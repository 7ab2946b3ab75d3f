use lrn_store::TransferError;

/// Model registry could not be queried or written.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry query failed: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("artifact upload failed: {0}")]
    Upload(#[from] TransferError),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
