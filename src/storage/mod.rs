//! Object store abstractions for catalog persistence.
//!
//! Catalogs live as flat objects in a single bucket, one per program and
//! term. Each object carries its identity in a metadata side-channel:
//!
//! ```text
//! bucket/
//! ├── ingenieria-informatica-1C-2024.json   # body: JSON array of courses
//! │     carrera       = SW5nZW5pZXLDrWEgSW5mb3Jtw6F0aWNh
//! │     cuatri-numero = 1
//! │     cuatri-anio   = 2024
//! └── ingenieria-civil-2C-2023.json
//! ```

pub mod local;
pub mod memory;
pub mod paths;
#[cfg(feature = "s3")]
pub mod s3;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, StorageBackend};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Content type of every stored catalog body.
pub const CONTENT_TYPE: &str = "application/json";
/// Content language of every stored catalog body.
pub const CONTENT_LANGUAGE: &str = "es";

/// One page of a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    pub keys: Vec<String>,
    /// Token for the next page, `None` on the last page
    pub next_token: Option<String>,
}

/// Everything a store reports about an object without its body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    pub metadata: HashMap<String, String>,
    pub content_type: Option<String>,
    pub content_language: Option<String>,
}

/// A single object write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub metadata: HashMap<String, String>,
    pub content_type: String,
    pub content_language: String,
}

/// Flat key-value blob store with a metadata side-channel.
///
/// Every operation may fail with `StorageUnavailable`. `head` and
/// `get_body` report `NotFound` for absent keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of keys, starting after `token`.
    async fn list_page(&self, token: Option<String>) -> Result<KeyPage>;

    /// Fetch an object's metadata.
    async fn head(&self, key: &str) -> Result<ObjectHead>;

    /// Fetch an object's body.
    async fn get_body(&self, key: &str) -> Result<Vec<u8>>;

    /// Write an object, replacing any existing one at the same key.
    async fn put_object(&self, object: PutObject) -> Result<()>;

    /// List every key, following continuation tokens until exhausted.
    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut token = None;

        loop {
            let page = self.list_page(token).await?;
            keys.extend(page.keys);

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(keys)
    }
}

/// Build the store selected by configuration.
pub async fn from_config(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::Local => Arc::new(LocalStorage::new(&storage.local_root)),
        StorageBackend::Memory => Arc::new(MemoryStorage::with_page_size(storage.page_size)),
        #[cfg(feature = "s3")]
        StorageBackend::S3 => Arc::new(s3::S3Storage::from_config(storage).await),
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => {
            return Err(crate::error::AppError::config(
                "S3 backend requires the 's3' feature",
            ));
        }
    };
    Ok(store)
}
