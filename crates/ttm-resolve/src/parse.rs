//! Ticket-text parser: phone, time, address, city and notes from raw
//! OCR or speech text.
//!
//! Every extractor is total. Unrecognized input yields `None` fields and a
//! confidence of zero, never an error.

use serde::Serialize;
use ttm_core::PartialAddress;

use crate::parse_helpers::{
    collapse_whitespace, format_phone, format_time, has_street_type, ADDRESS_LINE,
    HOUR_PATTERNS, NOTE_KEYWORDS, OCR_ONE, OCR_ZERO, PHONE_PATTERNS, SPACED_H, STANDALONE_SS,
};

const CITY_MAX_TOKENS: usize = 4;
const CITY_MIN_CHARS: usize = 3;
const CITY_MAX_CHARS: usize = 28;
const FIELD_COUNT: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    /// Share of the five fields that were found, in `[0, 1]`.
    pub confidence: f64,
    /// The cleaned lines the extractors saw.
    pub debug_lines: Vec<String>,
}

impl ParseResult {
    /// Address and city as input for the resolver.
    #[must_use]
    pub fn partial_address(&self) -> PartialAddress {
        PartialAddress::new(self.address.as_deref(), self.city.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressAndCity {
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Split raw text into whitespace-collapsed, non-blank lines. Tabs and
/// carriage returns count as line breaks.
#[must_use]
pub fn clean_lines(raw: &str) -> Vec<String> {
    raw.split(['\n', '\r', '\t'])
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// First phone-like substring, tried pattern by pattern, in display form.
#[must_use]
pub fn extract_phone(raw: &str) -> Option<String> {
    PHONE_PATTERNS.iter().find_map(|pattern| {
        let found = pattern.regex.find(raw)?;
        let phone = format_phone(found.as_str().trim());
        tracing::debug!(pattern = pattern.name, phone = %phone, "matched phone");
        Some(phone)
    })
}

/// First valid `HH:MM` time. Out-of-range readings such as `25h99` are
/// skipped rather than wrapped.
#[must_use]
pub fn extract_time(raw: &str) -> Option<String> {
    let text = OCR_ONE.replace_all(raw, "1");
    let text = OCR_ZERO.replace_all(&text, "0");
    let text = SPACED_H.replace_all(&text, "h");

    for pattern in HOUR_PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(&text) {
            let (Ok(hour), Ok(minute)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                continue;
            };
            if hour <= 23 && minute <= 59 {
                tracing::debug!(pattern = pattern.name, hour, minute, "matched time");
                return Some(format_time(hour, minute));
            }
        }
    }
    None
}

/// Address is the first `<number> <street words>` line containing a street
/// type. City is the last short line with no digits, phone, hour or street
/// type.
///
/// Taking the last city-like line suits tickets that print the city below
/// the notes; it is a layout heuristic, not a guarantee.
#[must_use]
pub fn extract_address_and_city(lines: &[String]) -> AddressAndCity {
    let address = lines.iter().find_map(|line| {
        let caps = ADDRESS_LINE.captures(line)?;
        let rest = &caps[2];
        has_street_type(rest).then(|| collapse_whitespace(&format!("{} {rest}", &caps[1])))
    });

    let city = lines
        .iter()
        .rev()
        .map(|line| line.trim())
        .find(|line| looks_like_city(line))
        .map(str::to_string);

    AddressAndCity { address, city }
}

fn looks_like_city(line: &str) -> bool {
    if line.is_empty() || line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if PHONE_PATTERNS.iter().any(|p| p.regex.is_match(line))
        || HOUR_PATTERNS.iter().any(|p| p.regex.is_match(line))
        || has_street_type(line)
    {
        return false;
    }
    let tokens = line.split_whitespace().count();
    let chars = line.chars().count();
    (1..=CITY_MAX_TOKENS).contains(&tokens) && (CITY_MIN_CHARS..=CITY_MAX_CHARS).contains(&chars)
}

/// Order notes (cutting, cutlery, toppings) joined with `"; "`, in keyword
/// order. A standalone `ss` is read as `sans`.
#[must_use]
pub fn extract_notes(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let text = STANDALONE_SS.replace_all(&lower, "sans");

    let mut found: Vec<&str> = Vec::new();
    for &keyword in NOTE_KEYWORDS {
        if text.contains(keyword) && !found.contains(&keyword) {
            found.push(keyword);
        }
    }
    if found.is_empty() {
        None
    } else {
        Some(found.join("; "))
    }
}

/// Run every extractor over `raw`.
#[must_use]
pub fn parse_ticket_text(raw: &str) -> ParseResult {
    let lines = clean_lines(raw);
    let phone = extract_phone(raw);
    let time = extract_time(raw);
    let AddressAndCity { address, city } = extract_address_and_city(&lines);
    let notes = extract_notes(raw);

    let found = [&address, &city, &phone, &time, &notes]
        .iter()
        .filter(|field| field.is_some())
        .count();
    let found = u8::try_from(found).unwrap_or(FIELD_COUNT);
    let confidence = f64::from(found) / f64::from(FIELD_COUNT);

    tracing::debug!(lines = lines.len(), confidence, "parsed ticket text");

    ParseResult {
        address,
        city,
        phone,
        time,
        notes,
        confidence,
        debug_lines: lines,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
