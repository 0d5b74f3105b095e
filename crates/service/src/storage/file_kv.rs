use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;

use crate::errors::ServiceError;
use crate::storage::kv::KeyValueStore;

/// File-backed key-value store: one file per key under a data directory.
///
/// Keys are namespaced like `service_catalog.services` and map to
/// `<dir>/<key>.json`; a missing file reads as `None`.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Initialize the store rooted at `dir`, creating the directory if missing.
    pub async fn new<P: Into<PathBuf>>(dir: P) -> Result<Arc<Self>, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(Arc::new(Self { dir }))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys are fixed constants today; sanitize anyway
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        fs::write(self.path_for(key), value)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }
}
