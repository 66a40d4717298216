use async_trait::async_trait;

use crate::models::CartLineItem;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot is not parseable: {0}")]
    Corrupt(String),

    #[error("Snapshot storage failed: {0}")]
    Storage(String),
}

/// Durable home of the cart between runs.
///
/// There is exactly one snapshot; every save replaces it wholesale. `load`
/// distinguishes "nothing saved yet" (`Ok(None)`) from a snapshot that exists
/// but cannot be read back (`Err(Corrupt)`).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, items: &[CartLineItem]) -> Result<(), SnapshotError>;

    async fn load(&self) -> Result<Option<Vec<CartLineItem>>, SnapshotError>;
}
