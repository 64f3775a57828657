pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

/// A key-value capability holding opaque text blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    /// Overwrites whatever was stored under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;
}
