use super::*;
use lrn_core::*;
use std::io::Read;
use std::io::Write;

/// The learner's view of the remote sample stream.
#[async_trait::async_trait]
pub trait Units: Send + Sync {
    /// Unit names strictly greater than `cursor`, ascending. Every unit when `cursor` is `None`.
    async fn list_new(&self, cursor: Option<&str>) -> Result<Vec<Name>, TransferError>;
    /// Decompressed contents of one unit.
    async fn fetch(&self, unit: &str) -> Result<Vec<u8>, TransferError>;
}

/// [`Units`] laid out as `<prefix><name><suffix>` blobs in an [`ObjectStore`].
pub struct SampleSource<S> {
    store: S,
    prefix: String,
    suffix: String,
}

impl<S> From<S> for SampleSource<S>
where
    S: ObjectStore,
{
    fn from(store: S) -> Self {
        Self::new(store, SAMPLE_PREFIX, SAMPLE_SUFFIX)
    }
}

impl<S> SampleSource<S>
where
    S: ObjectStore,
{
    pub fn new(store: S, prefix: &str, suffix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    /// Store key of a unit.
    pub fn key(&self, unit: &str) -> String {
        format!("{}{}{}", self.prefix, unit, self.suffix)
    }
    /// Unit name of a store key, if the key follows the layout.
    pub fn name(&self, key: &str) -> Option<Name> {
        key.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
    /// Inclusive listing bound that excludes `cursor` and everything before it.
    ///
    /// Only exact for names that never extend one another: a name `cursor + "X"`
    /// sorts before `cursor + SENTINEL` and would be skipped.
    fn after(&self, cursor: &str) -> String {
        format!("{}{}{}", self.prefix, cursor, SENTINEL)
    }
}

#[async_trait::async_trait]
impl<S> Units for SampleSource<S>
where
    S: ObjectStore,
{
    async fn list_new(&self, cursor: Option<&str>) -> Result<Vec<Name>, TransferError> {
        let from = cursor.map(|c| self.after(c));
        let keys = self.store.list(&self.prefix, from.as_deref()).await?;
        let mut names = keys
            .iter()
            .filter_map(|key| {
                let name = self.name(key);
                if name.is_none() {
                    log::debug!("{:<32}{:<32}", "skipping foreign key", key);
                }
                name
            })
            .filter(|name| cursor.map_or(true, |c| name.as_str() > c))
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        Ok(names)
    }
    async fn fetch(&self, unit: &str) -> Result<Vec<u8>, TransferError> {
        let key = self.key(unit);
        log::info!("{:<32}{:<32}", "downloading unit", key);
        let packed = self.store.get(&key).await?;
        unpack(&packed).map_err(|source| TransferError::Decompress { key, source })
    }
}

/// bzip2-compresses a unit body the way producers upload it.
pub fn pack(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
    encoder
        .write_all(bytes)
        .and_then(|_| encoder.finish())
        .unwrap_or_default()
}

/// Inverse of [`pack`].
pub fn unpack(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    bzip2::read::BzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}
