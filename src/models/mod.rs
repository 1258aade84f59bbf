// src/models/mod.rs

//! Domain models for catalog ingestion.

mod catalog;
mod config;
pub mod metadata;

// Re-export all public types
pub use catalog::{CatalogIdentity, CourseList, ParsedCatalog, Term};
pub use config::{Config, LoggingConfig, ServiceConfig, StorageBackend, StorageConfig};
pub use metadata::EncodedMetadata;
