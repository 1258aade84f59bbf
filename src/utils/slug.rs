// src/utils/slug.rs

//! Program name slugs for object keys.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Turn a program name into a key-safe slug.
///
/// Diacritics are stripped, the result is lowercased and every space becomes
/// a hyphen. Punctuation and digits pass through untouched.
///
/// # Examples
/// ```
/// use planes::utils::slug::slugify;
///
/// assert_eq!(slugify("Ingeniería Informática"), "ingenieria-informatica");
/// ```
pub fn slugify(program: &str) -> String {
    let stripped: String = program
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();

    stripped.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(slugify("Ingeniería Informática"), "ingenieria-informatica");
        assert_eq!(slugify("Año"), "ano");
        assert_eq!(slugify("Ingeniería en Petróleo"), "ingenieria-en-petroleo");
    }

    #[test]
    fn test_decomposed_input_matches_composed() {
        let composed = "Ingenier\u{00ED}a";
        let decomposed = "Ingenieri\u{0301}a";
        assert_eq!(slugify(composed), slugify(decomposed));
    }

    #[test]
    fn test_punctuation_and_digits_pass_through() {
        assert_eq!(slugify("Plan 2023 (v.2)"), "plan-2023-(v.2)");
        assert_eq!(slugify("A/B_C"), "a/b_c");
    }

    #[test]
    fn test_every_space_is_replaced() {
        assert_eq!(slugify("  Doble  Espacio "), "--doble--espacio-");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "Ingeniería Informática",
            "LICENCIATURA EN ANÁLISIS DE SISTEMAS",
            "Ingeniería Electrónica",
            "Ñandú Çedilla Ü",
            "İstanbul",
            "",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }
}
