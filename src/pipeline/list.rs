// src/pipeline/list.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::{CatalogIdentity, Config, CourseList};
use crate::services::{CatalogLister, deadline_from_secs, with_deadline};
use crate::storage::ObjectStore;

/// Rebuild the public catalog index.
pub async fn run_list(
    config: &Config,
    store: Arc<dyn ObjectStore>,
) -> Result<Vec<CatalogIdentity>> {
    let lister = CatalogLister::new(store);
    let deadline = deadline_from_secs(config.service.request_timeout_secs);
    with_deadline(deadline, lister.list_all()).await
}

/// Read the courses stored for one catalog.
pub async fn run_show(
    config: &Config,
    store: Arc<dyn ObjectStore>,
    identity: &CatalogIdentity,
) -> Result<CourseList> {
    let lister = CatalogLister::new(store);
    let deadline = deadline_from_secs(config.service.request_timeout_secs);
    with_deadline(deadline, lister.courses(identity)).await
}
