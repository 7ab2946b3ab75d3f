use super::*;
use std::path::Path;
use std::path::PathBuf;

/// [`ObjectStore`] over a local directory; key `a/b/c` is file `<root>/a/b/c`.
///
/// Listing reads only the directory named by the prefix up to its last `/`,
/// which matches how producers lay units out (`sample/<name>.bz2`).
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    fn path(&self, key: &str) -> Result<PathBuf, TransferError> {
        let valid = key
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..");
        if valid {
            Ok(self.root.join(key))
        } else {
            Err(TransferError::Remote {
                key: key.to_string(),
                message: "key is not a relative path".to_string(),
            })
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for DirStore {
    async fn list(&self, prefix: &str, from: Option<&str>) -> Result<Vec<String>, TransferError> {
        let parent = prefix.rfind('/').map(|i| &prefix[..=i]).unwrap_or("");
        let mut entries = match tokio::fs::read_dir(self.root.join(parent)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TransferError::io(prefix, e)),
        };
        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TransferError::io(prefix, e))?
        {
            let file = entry
                .file_type()
                .await
                .map_err(|e| TransferError::io(prefix, e))?;
            if !file.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with(".tmp.") {
                    keys.push(format!("{}{}", parent, name));
                }
            }
        }
        keys.sort();
        Ok(bounded(keys.iter(), prefix, from))
    }
    async fn get(&self, key: &str) -> Result<Vec<u8>, TransferError> {
        tokio::fs::read(self.path(key)?)
            .await
            .map_err(|e| TransferError::io(key, e))
    }
    /// Writes to a hidden temporary file first, then renames it into place.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        let path = self.path(key)?;
        let parent = path.parent().unwrap_or(&self.root).to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let temp = parent.join(format!(".tmp.{}.{}", std::process::id(), name));
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| TransferError::io(key, e))?;
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| TransferError::io(key, e))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|e| TransferError::io(key, e))
    }
}
