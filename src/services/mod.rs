//! Service layer for catalog ingestion.
//!
//! This module contains the business logic for:
//! - Parsing scraped content (`CatalogParser`, `JsonCatalogParser`)
//! - Checking for stored duplicates (`ExistenceResolver`)
//! - Writing new catalogs (`CatalogIngestor`)
//! - Listing and reading stored catalogs (`CatalogLister`)

mod ingest;
mod listing;
mod parser;
mod resolver;

use std::future::Future;
use std::time::Duration;

pub use ingest::{CatalogIngestor, IngestOutcome};
pub use listing::CatalogLister;
pub use parser::{CatalogParser, JsonCatalogParser};
pub use resolver::ExistenceResolver;

use crate::error::{AppError, Result};

/// Run a request under a deadline.
///
/// On expiry the future is dropped, abandoning any in-flight store call.
/// `None` runs without a deadline.
pub async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| AppError::Timeout(limit.as_secs()))?,
        None => fut.await,
    }
}

/// Deadline from a configured number of seconds; 0 disables it.
pub fn deadline_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_elapses() {
        let result: Result<()> = with_deadline(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(0))));
    }

    #[tokio::test]
    async fn test_no_deadline_passes_through() {
        let result = with_deadline(None, async { Ok(7) }).await.unwrap();
        assert_eq!(result, 7);
    }

    #[test]
    fn test_deadline_from_secs() {
        assert_eq!(deadline_from_secs(0), None);
        assert_eq!(deadline_from_secs(30), Some(Duration::from_secs(30)));
    }
}
