//! Pattern tables for ticket field extraction.
//!
//! Each field is an ordered list of independent matchers; the first one
//! that yields a valid value wins. New ticket layouts are supported by
//! adding rows here.

use std::sync::LazyLock;

use regex::Regex;

/// A named pattern in a per-field matcher list.
pub(crate) struct FieldPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl FieldPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("valid field pattern"),
        }
    }
}

/// French mobile, broad EU, then a permissive 9-14 digit fallback.
pub(crate) static PHONE_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        FieldPattern::new(
            "fr-mobile",
            r"(\+33\s?[67](?:[\s.\-]?\d{2}){4})|(\b0[67](?:[\s.\-]?\d{2}){4}\b)",
        ),
        FieldPattern::new("eu", r"\+?\d{2}\s?\d(?:[\s.\-]?\d{2}){4,5}"),
        FieldPattern::new(
            "fallback",
            r"(\+\d{2}[\s.\-]?\d(?:[\s.\-]?\d){7,12})|(\b0[1-9](?:[\s.\-]?\d){8,10}\b)",
        ),
    ]
});

/// Hour/minute layouts, tried in order. Group 1 is the hour, group 2 the minute.
pub(crate) static HOUR_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        FieldPattern::new("h-separated", r"(?i)(\b\d{1,2})\s*h\s*(\d{2})\b"),
        FieldPattern::new("colon-or-h", r"(\b\d{1,2})\s*[:h]\s*(\d{2})\b"),
        FieldPattern::new("hhmm", r"(\b\d{2})(\d{2})\b"),
    ]
});

/// `16 Rue du Parc`: a 1-3 digit number, then street words.
pub(crate) static ADDRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3})\s+([A-Za-zÀ-ÿ'’ \-]{2,})").expect("valid address line regex")
});

/// OCR reads `1` as `l`/`I` and `0` as `o`/`O` in digit-heavy fields.
pub(crate) static OCR_ONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[lI]").expect("valid OCR one regex"));
pub(crate) static OCR_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[oO]").expect("valid OCR zero regex"));
pub(crate) static SPACED_H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*h\s*").expect("valid spaced h regex"));

pub(crate) static STANDALONE_SS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bss\b").expect("valid ss regex"));

pub(crate) static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub(crate) const STREET_TYPES: &[&str] = &[
    "rue", "avenue", "av", "impasse", "chemin", "place", "boulevard", "bd", "allée", "allee",
    "quai", "route", "cours",
];

/// Order matters: matched keywords are reported in this order.
pub(crate) const NOTE_KEYWORDS: &[&str] = &[
    "coupé",
    "coupe",
    "coupée",
    "couteau",
    "fourchette",
    "sans",
    "anchois",
    "oignon",
    "oignons",
    "olive",
    "olives",
    "4 from",
    "4from",
    "4 fromage",
    "4 fromages",
    "4fro",
    "fromage",
];

/// Whole-word, case-insensitive street-type check.
pub(crate) fn has_street_type(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split_whitespace()
        .any(|word| STREET_TYPES.contains(&word))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Display form of a matched phone number.
///
/// French mobile trunk prefixes (`06`, `07`) become `+33`. With a country
/// code, the remaining digits are paired from the right so that
/// `0788867102` reads `+33 7 88 86 71 02`. Without one, digits are paired
/// from the left.
pub(crate) fn format_phone(matched: &str) -> String {
    let kept: String = matched
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let international = if kept.starts_with("06") || kept.starts_with("07") {
        format!("+33{}", &kept[1..])
    } else {
        kept
    };

    let country = international
        .strip_prefix('+')
        .filter(|rest| rest.len() > 2 && rest.chars().all(|c| c.is_ascii_digit()));
    match country {
        Some(rest) => {
            let (code, subscriber) = rest.split_at(2);
            let lead = subscriber.len() % 2;
            let mut groups: Vec<&str> = Vec::new();
            if lead == 1 {
                groups.push(&subscriber[..1]);
            }
            groups.extend(pairs(&subscriber[lead..]));
            format!("+{code} {}", groups.join(" "))
        }
        None => pairs(&international).collect::<Vec<_>>().join(" "),
    }
}

fn pairs(digits: &str) -> impl Iterator<Item = &str> {
    // Input is ASCII after filtering, so byte offsets are char offsets.
    (0..digits.len())
        .step_by(2)
        .map(move |i| &digits[i..(i + 2).min(digits.len())])
}

pub(crate) fn format_time(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour % 24, minute % 60)
}
