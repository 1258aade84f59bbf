// src/lambda/mod.rs

//! AWS Lambda transport for catalog ingestion and listing.
//!
//! Each invocation carries one request:
//!
//! - `{"method": "POST", "body": "<scraped plan>"}` ingests a catalog
//! - `{"method": "GET"}` lists every stored catalog
//!
//! Outcomes map onto HTTP-style status codes: 201 created, 202 already
//! stored, 400 invalid input, 405 unknown method, 500 internal failure.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::services::{
    CatalogIngestor, CatalogLister, IngestOutcome, JsonCatalogParser, with_deadline,
};
use crate::storage::ObjectStore;

/// Lambda invocation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRequest {
    #[serde(default = "default_method")]
    pub method: String,

    /// Raw scraped content for POST
    #[serde(default)]
    pub body: String,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Lambda response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogResponse {
    pub status_code: u16,
    pub body: Value,
}

impl CatalogResponse {
    fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }

    fn message(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(status_code, Value::String(message.into()))
    }
}

/// Route one request to ingestion or listing.
pub async fn respond(
    store: Arc<dyn ObjectStore>,
    request: &CatalogRequest,
    deadline: Option<Duration>,
) -> CatalogResponse {
    match request.method.to_ascii_uppercase().as_str() {
        "POST" => {
            let ingestor = CatalogIngestor::new(store, JsonCatalogParser);
            match with_deadline(deadline, ingestor.ingest(request.body.as_bytes())).await {
                Ok(outcome @ IngestOutcome::Created { .. }) => {
                    CatalogResponse::new(201, to_value(&outcome))
                }
                Ok(outcome @ IngestOutcome::AlreadyExists { .. }) => {
                    CatalogResponse::new(202, to_value(&outcome))
                }
                Err(e) => error_response(&e, "Internal error storing the catalog."),
            }
        }
        "GET" => {
            let lister = CatalogLister::new(store);
            match with_deadline(deadline, lister.list_all()).await {
                Ok(catalogs) => CatalogResponse::new(200, to_value(&catalogs)),
                Err(e) => error_response(&e, "Internal error listing stored catalogs."),
            }
        }
        other => {
            warn!("Rejecting method {}", other);
            CatalogResponse::message(405, format!("Method {other} not allowed"))
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Client errors echo the parser's message; internal ones stay generic.
fn error_response(err: &AppError, internal_message: &str) -> CatalogResponse {
    if err.is_client_error() {
        info!("Rejected input: {}", err);
        CatalogResponse::message(400, err.to_string())
    } else {
        error!("Request failed: {}", err);
        CatalogResponse::message(500, internal_message)
    }
}

/// Time left before `deadline`; an already expired deadline leaves none.
#[cfg(any(feature = "lambda", test))]
fn remaining(deadline: std::time::SystemTime, now: std::time::SystemTime) -> Option<Duration> {
    Some(deadline.duration_since(now).unwrap_or(Duration::ZERO))
}

/// Main Lambda handler function.
#[cfg(feature = "lambda")]
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler(
    event: lambda_runtime::LambdaEvent<CatalogRequest>,
    store: Arc<dyn ObjectStore>,
) -> std::result::Result<CatalogResponse, lambda_runtime::Error> {
    let (request, context) = event.into_parts();
    let deadline = remaining(context.deadline(), std::time::SystemTime::now());

    info!("Handling {} request", request.method);
    Ok(respond(store, &request, deadline).await)
}
