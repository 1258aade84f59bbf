//! Pipeline entry points for catalog operations.
//!
//! - `run_ingest`: Store a scraped catalog unless it already exists
//! - `run_list`: Rebuild the catalog index from stored metadata
//! - `run_show`: Read one catalog's courses
//! - `run_validate`: Check configuration

pub mod ingest;
pub mod list;
pub mod validate;

pub use ingest::run_ingest;
pub use list::{run_list, run_show};
pub use validate::run_validate;
