// src/services/listing.rs

//! Read path: rebuild catalog identities from stored metadata.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::models::{CatalogIdentity, CourseList, EncodedMetadata};
use crate::storage::{ObjectStore, paths};

/// Lists and reads stored catalogs.
pub struct CatalogLister<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ObjectStore + ?Sized> CatalogLister<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every stored catalog whose metadata decodes, in store listing order.
    ///
    /// Objects with missing or malformed tags are logged and left out.
    /// Listing or head failures abort the whole call.
    #[instrument(skip_all)]
    pub async fn list_all(&self) -> Result<Vec<CatalogIdentity>> {
        let keys = self
            .store
            .list_keys()
            .await
            .map_err(AppError::into_storage_unavailable)?;
        let mut catalogs = Vec::with_capacity(keys.len());

        for key in &keys {
            let head = self
                .store
                .head(key)
                .await
                .map_err(AppError::into_storage_unavailable)?;

            match EncodedMetadata::from(head.metadata).decode() {
                Ok(identity) => catalogs.push(identity),
                Err(e) => warn!(key = %key, "Skipping object: {}", e),
            }
        }

        info!("Listed {} of {} stored objects", catalogs.len(), keys.len());
        Ok(catalogs)
    }

    /// Courses stored for a catalog.
    #[instrument(skip_all, fields(catalog = %identity))]
    pub async fn courses(&self, identity: &CatalogIdentity) -> Result<CourseList> {
        let key = paths::catalog_key(identity);
        let body = self.store.get_body(&key).await?;
        Ok(CourseList::from_body(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn seed(store: &MemoryStorage, identity: &CatalogIdentity, body: &[u8]) {
        store.insert(
            &paths::catalog_key(identity),
            body.to_vec(),
            EncodedMetadata::encode(identity).into_map(),
        );
    }

    #[tokio::test]
    async fn test_lists_decoded_identities() {
        let store = Arc::new(MemoryStorage::new());
        let a = CatalogIdentity::new("Ingeniería Civil", 1, 2024);
        let b = CatalogIdentity::new("Año Básico", 2, 2023);
        seed(&store, &a, b"[]");
        seed(&store, &b, b"[]");

        let mut listed = CatalogLister::new(store).list_all().await.unwrap();
        listed.sort_by(|x, y| x.program.cmp(&y.program));
        assert_eq!(listed, vec![b, a]);
    }

    #[tokio::test]
    async fn test_skips_malformed_metadata() {
        let store = Arc::new(MemoryStorage::new());
        seed(&store, &CatalogIdentity::new("Ingeniería Civil", 1, 2024), b"[]");

        let mut bad = EncodedMetadata::encode(&CatalogIdentity::new("Otra", 1, 2024)).into_map();
        bad.insert("cuatri-numero".to_string(), "uno".to_string());
        store.insert("otra-1C-2024.json", b"[]".to_vec(), bad);

        let listed = CatalogLister::new(store).list_all().await.unwrap();
        assert_eq!(listed, vec![CatalogIdentity::new("Ingeniería Civil", 1, 2024)]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let store = Arc::new(MemoryStorage::new());
        seed(&store, &CatalogIdentity::new("Ingeniería Civil", 1, 2024), b"[]");
        store.set_unavailable(true);

        let result = CatalogLister::new(store).list_all().await;
        assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_courses() {
        let store = Arc::new(MemoryStorage::new());
        let identity = CatalogIdentity::new("Ingeniería Civil", 1, 2024);
        seed(&store, &identity, br#"[{"codigo":"6103"}]"#);

        let lister = CatalogLister::new(store);
        let courses = lister.courses(&identity).await.unwrap();
        assert_eq!(courses.len(), 1);

        let missing = lister
            .courses(&CatalogIdentity::new("Ingeniería Civil", 2, 2024))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
