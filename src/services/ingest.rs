// src/services/ingest.rs

//! Catalog ingestion: parse, derive identity, dedup, write.
//!
//! The existence check and the write are two separate store round-trips.
//! Concurrent ingestions of the same catalog can both see it absent and
//! both write; nothing here serializes them.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::models::{CatalogIdentity, EncodedMetadata, ParsedCatalog};
use crate::services::{CatalogParser, ExistenceResolver};
use crate::storage::{CONTENT_LANGUAGE, CONTENT_TYPE, ObjectStore, PutObject, paths};

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A new object was written
    Created {
        key: String,
        identity: CatalogIdentity,
    },
    /// An equivalent catalog was already stored; nothing was written
    AlreadyExists {
        key: String,
        identity: CatalogIdentity,
    },
}

impl IngestOutcome {
    pub fn key(&self) -> &str {
        match self {
            Self::Created { key, .. } | Self::AlreadyExists { key, .. } => key,
        }
    }

    pub fn identity(&self) -> &CatalogIdentity {
        match self {
            Self::Created { identity, .. } | Self::AlreadyExists { identity, .. } => identity,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Stores parsed catalogs, skipping ones already present.
pub struct CatalogIngestor<S: ?Sized, P> {
    store: Arc<S>,
    parser: P,
}

impl<S: ObjectStore + ?Sized, P: CatalogParser> CatalogIngestor<S, P> {
    pub fn new(store: Arc<S>, parser: P) -> Self {
        Self { store, parser }
    }

    /// Ingest raw scraped content.
    ///
    /// - parser rejection: `InvalidInput`, the store is not touched
    /// - existence check failure: `StorageUnavailable` (or `MissingField`)
    /// - equivalent catalog found: `AlreadyExists`, no write
    /// - put failure: `StorageWrite`
    #[instrument(skip_all, fields(bytes = raw.len()))]
    pub async fn ingest(&self, raw: &[u8]) -> Result<IngestOutcome> {
        let ParsedCatalog { identity, courses } = self.parser.parse(raw).map_err(|e| match e {
            AppError::InvalidInput(_) => e,
            other => AppError::invalid_input(other),
        })?;

        let body = courses.to_body()?;
        let metadata = EncodedMetadata::encode(&identity);
        let key = paths::catalog_key(&identity);

        info!(
            key = %key,
            carrera = %identity.program,
            cuatrimestre = identity.term_number(),
            anio = identity.year(),
            "Parsed catalog with {} courses",
            courses.len()
        );

        let resolver = ExistenceResolver::new(self.store.as_ref());
        if resolver.exists(&metadata).await? {
            return Ok(IngestOutcome::AlreadyExists { key, identity });
        }

        self.store
            .put_object(PutObject {
                key: key.clone(),
                body,
                metadata: metadata.into_map(),
                content_type: CONTENT_TYPE.to_string(),
                content_language: CONTENT_LANGUAGE.to_string(),
            })
            .await
            .map_err(AppError::into_storage_write)?;

        info!(key = %key, "Stored catalog");
        Ok(IngestOutcome::Created { key, identity })
    }
}
