// src/pipeline/ingest.rs

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::models::Config;
use crate::services::{
    CatalogIngestor, IngestOutcome, JsonCatalogParser, deadline_from_secs, with_deadline,
};
use crate::storage::ObjectStore;

/// Ingest a scraped catalog file.
pub async fn run_ingest(
    config: &Config,
    store: Arc<dyn ObjectStore>,
    input: &Path,
) -> Result<IngestOutcome> {
    let raw = tokio::fs::read(input).await?;
    info!("Read {} bytes from {}", raw.len(), input.display());

    let ingestor = CatalogIngestor::new(store, JsonCatalogParser);
    let deadline = deadline_from_secs(config.service.request_timeout_secs);
    let outcome = with_deadline(deadline, ingestor.ingest(&raw)).await?;

    match &outcome {
        IngestOutcome::Created { key, identity } => {
            info!("Created {} for {}", key, identity)
        }
        IngestOutcome::AlreadyExists { key, identity } => {
            info!("{} already stored as {}; nothing written", identity, key)
        }
    }

    Ok(outcome)
}
