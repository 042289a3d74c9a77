use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derives a URL-safe slug from arbitrary text: canonical decomposition,
/// diacritics stripped, lowercased, every run of characters outside
/// `[a-z0-9]` collapsed to a single hyphen, leading/trailing hyphens
/// trimmed. Pure and deterministic; every call site recomputes slugs
/// independently and must agree byte-for-byte.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                if gap && !out.is_empty() {
                    out.push('-');
                }
                gap = false;
                out.push(lower);
            } else {
                gap = true;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_punctuation() {
        assert_eq!(
            slugify("Ad Finem — Seguridad Jurídica"),
            "ad-finem-seguridad-juridica"
        );
    }

    #[test]
    fn collapses_separator_runs_and_trims() {
        assert_eq!(slugify("  Hola,   mundo!! "), "hola-mundo");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn handles_enye_and_uppercase_accents() {
        assert_eq!(slugify("Año Nuevo: BALANCE"), "ano-nuevo-balance");
    }

    #[test]
    fn output_is_deterministic_and_well_formed() {
        let inputs = [
            "Reforma laboral 2026",
            "¿Qué cambió?",
            "été — ÉTÉ",
            "123 ... 456",
        ];
        for s in inputs {
            let a = slugify(s);
            let b = slugify(s);
            assert_eq!(a, b);
            if !a.is_empty() {
                assert!(!a.starts_with('-') && !a.ends_with('-'));
                assert!(!a.contains("--"));
                assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
            }
        }
    }
}
