//! Remote content store access.
//!
//! Producers upload compressed sample units under a fixed prefix; the
//! learner lists what is new and downloads units one at a time. Trained
//! artifacts go back into the same store.
//!
//! ## Core Types
//!
//! - [`ObjectStore`] — list/get/put of named blobs
//! - [`MemoryStore`] — in-process store with failure injection
//! - [`DirStore`] — local directory tree
//! - [`S3Store`] — S3 or any S3-compatible endpoint
//! - [`Units`] — the learner's view: units newer than a cursor, and their bytes
//! - [`SampleSource`] — [`Units`] over any [`ObjectStore`]
mod dir;
mod error;
mod memory;
mod object;
mod s3;
mod source;

pub use dir::*;
pub use error::*;
pub use memory::*;
pub use object::*;
pub use s3::*;
pub use source::*;

use std::sync::Arc;

/// Opens a store from a URL.
///
/// - `s3://bucket/prefix` — [`S3Store`] with ambient AWS credentials
/// - `file:///path` or a bare path — [`DirStore`]
/// - `memory:` — an empty [`MemoryStore`]
pub async fn open(url: &str) -> Result<Arc<dyn ObjectStore>, TransferError> {
    log::info!("{:<32}{:<32}", "opening store", url);
    if let Some(rest) = url.strip_prefix("s3://") {
        Ok(Arc::new(S3Store::from_url(rest).await?))
    } else if let Some(path) = url.strip_prefix("file://") {
        Ok(Arc::new(DirStore::new(path)))
    } else if url == "memory:" {
        Ok(Arc::new(MemoryStore::default()))
    } else if url.contains("://") {
        Err(TransferError::Url(url.to_string()))
    } else {
        Ok(Arc::new(DirStore::new(url)))
    }
}
