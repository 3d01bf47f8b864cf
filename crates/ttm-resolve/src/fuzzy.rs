//! Text normalization and edit-distance similarity.
//!
//! [`similarity`] is the single scoring primitive used by the resolver,
//! the street suggestions and the speech extractor.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for comparison: lower-case, strip diacritics, turn anything
/// outside `[a-z0-9]` into a space, collapse and trim whitespace.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case- and accent-insensitive form of a single character.
fn fold_char(c: char) -> char {
    c.to_lowercase()
        .nfd()
        .find(|m| !is_combining_mark(*m))
        .unwrap_or(c)
}

/// Levenshtein distance over characters. Letters equal up to case or accent
/// (`'É'` vs `'e'`) substitute at no cost.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let left: Vec<char> = a.chars().map(fold_char).collect();
    let right: Vec<char> = b.chars().map(fold_char).collect();
    strsim::generic_levenshtein(&left, &right)
}

/// Similarity in `[0, 1]` between the normalized forms of `a` and `b`.
///
/// Two empty strings are identical (1); one empty string matches nothing (0).
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = normalize(a);
    let right = normalize(b);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let distance = edit_distance(&left, &right);
            let longest = left.chars().count().max(right.chars().count());
            // Street names are short; both values fit f64's mantissa exactly.
            #[allow(clippy::cast_precision_loss)]
            let ratio = distance as f64 / longest as f64;
            1.0 - ratio
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_diacritics_and_case() {
        assert_eq!(normalize("Créteil"), "creteil");
        assert_eq!(normalize("creteil"), "creteil");
        assert_eq!(normalize("Rue de la Crayère"), "rue de la crayere");
    }

    #[test]
    fn normalize_replaces_punctuation_and_collapses_spaces() {
        assert_eq!(normalize("  Place de l'Église -- N°3 "), "place de l eglise n 3");
        assert_eq!(normalize("Mailly-Champagne\n\tRue"), "mailly champagne rue");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["Créteil", "  Rue  Saint-Basle ", "ÀÉÎÕÜ ç ß", "", "12 bis, Allée"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn normalize_drops_non_latin_symbols() {
        assert_eq!(normalize("☎ 06"), "06");
        assert_eq!(normalize("€€€"), "");
    }

    #[test]
    fn edit_distance_identity_and_basic_ops() {
        assert_eq!(edit_distance("rue haute", "rue haute"), 0);
        assert_eq!(edit_distance("rue", "rues"), 1);
        assert_eq!(edit_distance("parc", "porc"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn edit_distance_ignores_case_and_accents() {
        assert_eq!(edit_distance("Crayère", "crayere"), 0);
        assert_eq!(edit_distance("ÉCOLE", "ecole"), 0);
    }

    #[test]
    fn edit_distance_is_symmetric() {
        let pairs = [("pleudihen", "pleudhien"), ("rue du parc", "rue parc"), ("a", "")];
        for (a, b) in pairs {
            assert_eq!(edit_distance(a, b), edit_distance(b, a));
        }
    }

    #[test]
    fn edit_distance_triangle_inequality() {
        let words = ["verzenay", "verzy", "verzenai", "ludes", ""];
        for a in words {
            for b in words {
                for c in words {
                    assert!(edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c));
                }
            }
        }
    }

    #[test]
    fn similarity_bounds() {
        assert!((similarity("Rue Haute", "Rue Haute") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("Rue Haute", "").abs() < f64::EPSILON);
        assert!(similarity("", "Rue Haute").abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_of_punctuation_only_is_empty() {
        assert!((similarity("--", "!!") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("--", "rue").abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_is_symmetric() {
        let pairs = [("Rue du Parc", "rue du porc"), ("Verzenay", "Verzy"), ("x", "yz")];
        for (a, b) in pairs {
            assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn similarity_scales_with_distance() {
        // "rue du parc" vs "rue du porc": one substitution over 11 chars.
        let score = similarity("Rue du Parc", "Rue du Porc");
        assert!((score - (1.0 - 1.0 / 11.0)).abs() < 1e-9, "got {score}");
        assert!((0.0..=1.0).contains(&similarity("abc", "xyz123")));
    }
}
