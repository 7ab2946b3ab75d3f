use super::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// In-process [`ObjectStore`] backed by a sorted map.
///
/// Keys registered with [`MemoryStore::fail`] error on `get`, and on `list`
/// when used as the prefix, which lets tests break a listing or a download
/// partway through an ingest walk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    failing: Mutex<BTreeSet<String>>,
    gets: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Inserts a blob without going through the async trait.
    pub fn insert(&self, key: impl Into<String>, bytes: Vec<u8>) {
        lock(&self.blobs).insert(key.into(), bytes);
    }
    /// Makes every later `get` of `key`, or `list` under prefix `key`, fail.
    pub fn fail(&self, key: impl Into<String>) {
        lock(&self.failing).insert(key.into());
    }
    /// Keys passed to `get`, in call order.
    pub fn gets(&self) -> Vec<String> {
        lock(&self.gets).clone()
    }
    pub fn keys(&self) -> Vec<String> {
        lock(&self.blobs).keys().cloned().collect()
    }
    pub fn len(&self) -> usize {
        lock(&self.blobs).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str, from: Option<&str>) -> Result<Vec<String>, TransferError> {
        if lock(&self.failing).contains(prefix) {
            return Err(TransferError::Remote {
                key: prefix.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(bounded(lock(&self.blobs).keys(), prefix, from))
    }
    async fn get(&self, key: &str) -> Result<Vec<u8>, TransferError> {
        lock(&self.gets).push(key.to_string());
        if lock(&self.failing).contains(key) {
            return Err(TransferError::Remote {
                key: key.to_string(),
                message: "injected failure".to_string(),
            });
        }
        lock(&self.blobs)
            .get(key)
            .cloned()
            .ok_or_else(|| TransferError::NotFound(key.to_string()))
    }
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        self.insert(key, bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let store = MemoryStore::default();
        for key in ["sample/A.bz2", "sample/B.bz2", "sample/C.bz2", "weights/X"] {
            store.insert(key, key.as_bytes().to_vec());
        }
        store
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let keys = store().list("sample/", None).await.unwrap();
        assert_eq!(keys, vec!["sample/A.bz2", "sample/B.bz2", "sample/C.bz2"]);
    }

    #[tokio::test]
    async fn list_bound_is_inclusive() {
        let keys = store().list("sample/", Some("sample/B.bz2")).await.unwrap();
        assert_eq!(keys, vec!["sample/B.bz2", "sample/C.bz2"]);
    }

    #[tokio::test]
    async fn injected_failure_hits_only_that_key() {
        let store = store();
        store.fail("sample/B.bz2");
        assert!(store.get("sample/A.bz2").await.is_ok());
        assert!(matches!(
            store.get("sample/B.bz2").await,
            Err(TransferError::Remote { .. })
        ));
        assert_eq!(store.gets(), vec!["sample/A.bz2", "sample/B.bz2"]);
    }

    #[tokio::test]
    async fn injected_failure_on_prefix_breaks_listing() {
        let store = store();
        store.fail("sample/");
        assert!(matches!(
            store.list("sample/", None).await,
            Err(TransferError::Remote { .. })
        ));
        assert!(store.list("weights/", None).await.is_ok());
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        assert!(matches!(
            store().get("sample/Z.bz2").await,
            Err(TransferError::NotFound(_))
        ));
    }
}
