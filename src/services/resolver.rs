// src/services/resolver.rs

//! Existence check for catalogs already in the store.
//!
//! The check is a linear scan: one `head` per stored object. Tag values are
//! compared as raw encoded strings, never decoded, so two programs whose
//! UTF-8 bytes differ are distinct here even when their keys collide.

use tracing::{debug, info, instrument};

use crate::error::{AppError, Result};
use crate::models::EncodedMetadata;
use crate::models::metadata::{IDENTITY_TAGS, PROGRAM_TAG};
use crate::storage::ObjectStore;

/// Scans a store for an object carrying given metadata.
pub struct ExistenceResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> ExistenceResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Whether any stored object carries all three identity tags with
    /// values equal to the candidate's.
    ///
    /// The candidate must carry every identity tag (`MissingField`
    /// otherwise). Any listing or head failure aborts the scan with
    /// `StorageUnavailable`; an incomplete scan is never reported as absent.
    #[instrument(skip_all, fields(carrera = ?candidate.get(PROGRAM_TAG)))]
    pub async fn exists(&self, candidate: &EncodedMetadata) -> Result<bool> {
        let wanted = IDENTITY_TAGS
            .iter()
            .map(|&tag| candidate.require(tag))
            .collect::<Result<Vec<&str>>>()?;

        let keys = self
            .store
            .list_keys()
            .await
            .map_err(AppError::into_storage_unavailable)?;
        debug!("Comparing against {} stored objects", keys.len());

        for key in keys {
            let head = self
                .store
                .head(&key)
                .await
                .map_err(AppError::into_storage_unavailable)?;

            let matches = IDENTITY_TAGS
                .iter()
                .zip(&wanted)
                .all(|(tag, value)| head.metadata.get(*tag).map(String::as_str) == Some(*value));

            if matches {
                info!(key = %key, "Catalog already stored");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
