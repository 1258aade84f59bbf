//! Object key layout.

use crate::models::CatalogIdentity;
use crate::utils::slugify;

/// Object key for a catalog: `{slug}-{term}C-{year}.json`.
///
/// Slugging is lossy, so programs differing only by case or diacritics
/// share a key.
pub fn catalog_key(identity: &CatalogIdentity) -> String {
    format!(
        "{}-{}C-{}.json",
        slugify(&identity.program),
        identity.term_number(),
        identity.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_key() {
        let identity = CatalogIdentity::new("Ingeniería Informática", 1, 2024);
        assert_eq!(catalog_key(&identity), "ingenieria-informatica-1C-2024.json");
    }

    #[test]
    fn test_catalog_key_is_deterministic() {
        let identity = CatalogIdentity::new("Licenciatura en Análisis de Sistemas", 2, 2023);
        let first = catalog_key(&identity);
        for _ in 0..10 {
            assert_eq!(catalog_key(&identity.clone()), first);
        }
        assert_eq!(first, "licenciatura-en-analisis-de-sistemas-2C-2023.json");
    }

    #[test]
    fn test_case_and_diacritics_collide() {
        let a = CatalogIdentity::new("INGENIERÍA CIVIL", 1, 2024);
        let b = CatalogIdentity::new("ingenieria civil", 1, 2024);
        assert_ne!(a, b);
        assert_eq!(catalog_key(&a), catalog_key(&b));
    }

    #[test]
    fn test_empty_program() {
        let identity = CatalogIdentity::new("", 1, 2024);
        assert_eq!(catalog_key(&identity), "-1C-2024.json");
    }
}
