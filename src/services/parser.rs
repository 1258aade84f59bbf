// src/services/parser.rs

//! Scraped content parsing.
//!
//! The scraper that turns registration-system pages into structured data
//! runs outside this crate. `CatalogParser` is the seam it plugs into;
//! `JsonCatalogParser` reads the structured form it emits.

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CatalogIdentity, CourseList, ParsedCatalog, Term};

/// Turns raw scraped content into an identity and its courses.
pub trait CatalogParser: Send + Sync {
    /// Parse raw bytes. Any rejection is an `InvalidInput` error whose
    /// message is reported back to the caller.
    fn parse(&self, raw: &[u8]) -> Result<ParsedCatalog>;
}

/// Structured scraper output.
#[derive(Debug, Deserialize)]
struct ScrapedPlan {
    carrera: String,
    cuatri: Term,
    #[serde(default)]
    materias: CourseList,
}

/// Parser for the scraper's JSON output.
///
/// ```json
/// {"carrera": "Ingeniería Informática",
///  "cuatri": {"numero": 1, "anio": 2024},
///  "materias": [{"codigo": "7540", "nombre": "Algoritmos I"}]}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCatalogParser;

impl CatalogParser for JsonCatalogParser {
    fn parse(&self, raw: &[u8]) -> Result<ParsedCatalog> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| AppError::invalid_input(format!("Content is not valid UTF-8: {e}")))?;

        let plan: ScrapedPlan = serde_json::from_str(text)
            .map_err(|e| AppError::invalid_input(format!("Could not read scraped plan: {e}")))?;

        if plan.carrera.trim().is_empty() {
            return Err(AppError::invalid_input("Program name is empty"));
        }
        if plan.cuatri.number == 0 {
            return Err(AppError::invalid_input("Term number must be positive"));
        }
        if !(1000..=9999).contains(&plan.cuatri.year) {
            return Err(AppError::invalid_input(format!(
                "Year {} is not a four-digit year",
                plan.cuatri.year
            )));
        }

        Ok(ParsedCatalog {
            identity: CatalogIdentity {
                program: plan.carrera,
                term: plan.cuatri,
            },
            courses: plan.materias,
        })
    }
}
