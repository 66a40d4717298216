use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use stagepass_cart::{CartLineItem, SnapshotError, SnapshotStore};

/// Cart snapshot as a single JSON file, replaced wholesale on every save.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, items: &[CartLineItem]) -> Result<(), SnapshotError> {
        let payload =
            serde_json::to_vec(items).map_err(|e| SnapshotError::Storage(e.to_string()))?;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| SnapshotError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|e| SnapshotError::Storage(e.to_string()))?;
        tracing::debug!("Cart snapshot written to {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<CartLineItem>>, SnapshotError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::Storage(e.to_string())),
        };
        let items =
            serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        Ok(Some(items))
    }
}
