//! Catalog identity and payload types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic identity of one term's program catalog.
///
/// Two identities are equivalent when the program names are byte-equal and
/// the term and year match. No normalization happens at comparison time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogIdentity {
    /// Program name as scraped (e.g., "Ingeniería Informática")
    #[serde(rename = "carrera")]
    pub program: String,

    #[serde(rename = "cuatri")]
    pub term: Term,
}

/// Academic term within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Term number within the year (1 or 2)
    #[serde(rename = "numero")]
    pub number: u32,

    /// Four-digit academic year
    #[serde(rename = "anio")]
    pub year: u32,
}

impl CatalogIdentity {
    pub fn new(program: impl Into<String>, term_number: u32, year: u32) -> Self {
        Self {
            program: program.into(),
            term: Term {
                number: term_number,
                year,
            },
        }
    }

    pub fn term_number(&self) -> u32 {
        self.term.number
    }

    pub fn year(&self) -> u32 {
        self.term.year
    }
}

impl std::fmt::Display for CatalogIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}C {})", self.program, self.term.number, self.term.year)
    }
}

/// Ordered course records, passed through without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseList(pub Vec<Value>);

impl CourseList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize to the stored body format (a JSON array).
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Deserialize a stored body.
    pub fn from_body(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Parser output: identity plus the courses it names.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCatalog {
    pub identity: CatalogIdentity,
    pub courses: CourseList,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_wire_shape() {
        let identity = CatalogIdentity::new("Ingeniería Informática", 1, 2024);
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(
            value,
            json!({"carrera": "Ingeniería Informática", "cuatri": {"numero": 1, "anio": 2024}})
        );
    }

    #[test]
    fn test_equivalence_is_byte_equality() {
        let composed = CatalogIdentity::new("Ingenier\u{00ED}a", 1, 2024);
        let decomposed = CatalogIdentity::new("Ingenieri\u{0301}a", 1, 2024);
        assert_ne!(composed, decomposed);
        assert_eq!(composed, CatalogIdentity::new("Ingeniería", 1, 2024));
    }

    #[test]
    fn test_course_list_keeps_order() {
        let courses = CourseList(vec![json!({"codigo": "7540"}), json!({"codigo": "6103"})]);
        let body = courses.to_body().unwrap();
        assert_eq!(body, br#"[{"codigo":"7540"},{"codigo":"6103"}]"#.to_vec());
        assert_eq!(CourseList::from_body(&body).unwrap(), courses);
    }
}
