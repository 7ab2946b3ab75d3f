use super::*;
use std::sync::Arc;

/// Minimal interface to a flat namespace of immutable blobs.
///
/// Keys are plain strings; "directories" are only a naming convention.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Keys starting with `prefix`, ascending, each `>= from` when a bound is given.
    ///
    /// The bound is inclusive: a key equal to `from` is returned.
    async fn list(&self, prefix: &str, from: Option<&str>) -> Result<Vec<String>, TransferError>;
    /// Full contents of one blob.
    async fn get(&self, key: &str) -> Result<Vec<u8>, TransferError>;
    /// Creates or replaces one blob.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransferError>;
}

#[async_trait::async_trait]
impl<S> ObjectStore for Arc<S>
where
    S: ObjectStore + ?Sized,
{
    async fn list(&self, prefix: &str, from: Option<&str>) -> Result<Vec<String>, TransferError> {
        self.as_ref().list(prefix, from).await
    }
    async fn get(&self, key: &str) -> Result<Vec<u8>, TransferError> {
        self.as_ref().get(key).await
    }
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        self.as_ref().put(key, bytes).await
    }
}

/// Applies the listing contract to an already-sorted key sequence.
pub(crate) fn bounded<'a>(
    keys: impl Iterator<Item = &'a String>,
    prefix: &str,
    from: Option<&str>,
) -> Vec<String> {
    keys.filter(|k| k.starts_with(prefix))
        .filter(|k| from.map_or(true, |f| k.as_str() >= f))
        .cloned()
        .collect()
}
