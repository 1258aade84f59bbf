//! AWS Lambda entry point for Planes.
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//!
//! ## Environment Variables
//!
//! - `S3_BUCKET`: bucket holding the catalogs (default: `fiuba-reviews-siu`)
//! - `STORAGE_BACKEND`: defaults to `s3` here
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use planes::lambda::{self, CatalogRequest};
use planes::models::{Config, StorageBackend};
use planes::storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let mut config = Config::default();
    config.storage.backend = StorageBackend::S3;
    config.apply_env();
    config.validate()?;

    let store = storage::from_config(&config).await?;
    tracing::info!("Planes Lambda starting (bucket: {})", config.storage.bucket);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<CatalogRequest>| {
        let store = store.clone();
        async move { lambda::handler(event, store).await }
    }))
    .await
}
