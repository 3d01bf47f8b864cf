//! Field extraction from a dictated transcript such as
//! `"12 rue du moulin à verzenay pour 19 heures 30"`.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use ttm_core::{PartialAddress, StreetIndex};

use crate::fuzzy::{normalize, similarity};
use crate::suggest::rank_city_streets;

const STREET_KEYWORDS: &str =
    "rue|avenue|boulevard|route|chemin|impasse|place|square|allée|allee|voie|passage|sentier|quai";

const MIN_CITY_SCORE: f64 = 0.55;
const MIN_STREET_SCORE: f64 = 0.45;

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s*(?:heures?|h|:)\s*(\d{1,2})?").expect("valid speech time regex")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,4}})\s*(?:bis|ter)?\s*(?:{STREET_KEYWORDS})\b"
    ))
    .expect("valid speech number regex")
});

static STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{STREET_KEYWORDS})\s+([a-zàâçéèêëîïôûùüÿñæœ0-9' \-]+)"
    ))
    .expect("valid speech street regex")
});

static FROM_A: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bà\b.*").expect("valid speech 'à' regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpeechExtraction {
    pub city: Option<String>,
    pub street: Option<String>,
    pub number: Option<u32>,
    pub time: Option<String>,
}

impl SpeechExtraction {
    /// `"<number> <street>"` and the city, for the resolver.
    #[must_use]
    pub fn partial_address(&self) -> PartialAddress {
        let address = self.street.as_ref().map(|street| match self.number {
            Some(number) => format!("{number} {street}"),
            None => street.clone(),
        });
        PartialAddress {
            address,
            city: self.city.clone(),
        }
    }
}

#[must_use]
pub fn extract_from_speech(
    text: &str,
    villages: &[String],
    index: &StreetIndex,
) -> SpeechExtraction {
    let mut result = SpeechExtraction::default();
    if text.trim().is_empty() {
        return result;
    }

    result.city = detect_city(text, villages);
    result.time = detect_time(text);
    result.number = NUMBER
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    let query = street_query(text, result.city.as_deref());
    if !query.is_empty() {
        result.street = result
            .city
            .as_deref()
            .and_then(|city| index.get(city))
            .and_then(|streets| rank_city_streets(streets, &query, 1).into_iter().next())
            .or_else(|| best_street_overall(index, &query));
    }

    tracing::debug!(
        city = ?result.city,
        street = ?result.street,
        number = ?result.number,
        time = ?result.time,
        "extracted speech fields"
    );
    result
}

/// A village named verbatim in the transcript scores 1; otherwise the whole
/// transcript is compared to the name.
fn detect_city(text: &str, villages: &[String]) -> Option<String> {
    let normalized_text = normalize(text);
    let mut best: Option<(&String, f64)> = None;
    for village in villages {
        let normalized_village = normalize(village);
        let score = if !normalized_village.is_empty() && normalized_text.contains(&normalized_village)
        {
            1.0
        } else {
            similarity(&normalized_text, &normalized_village)
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((village, score));
        }
    }
    best.filter(|(_, score)| *score >= MIN_CITY_SCORE)
        .map(|(village, _)| village.clone())
}

fn detect_time(text: &str) -> Option<String> {
    let caps = TIME.captures(text)?;
    let hour = caps[1].parse::<u32>().ok()?.min(23);
    let minute = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
        .min(59);
    Some(format!("{hour:02}:{minute:02}"))
}

/// Words after the street keyword, minus the city and anything from a
/// standalone "à" onward.
fn street_query(text: &str, city: Option<&str>) -> String {
    let Some(caps) = STREET.captures(text) else {
        return String::new();
    };
    let mut query = caps[1].to_string();
    if let Some(city) = city {
        if let Ok(re) = RegexBuilder::new(&regex::escape(city))
            .case_insensitive(true)
            .build()
        {
            query = re.replace(&query, "").trim().to_string();
        }
    }
    FROM_A.replace(&query, "").trim().to_string()
}

/// Containment ratio when the street name contains the query, similarity
/// otherwise.
fn best_street_overall(index: &StreetIndex, query: &str) -> Option<String> {
    let normalized_query = normalize(query);
    let mut best: Option<(&String, f64)> = None;
    for street in index.values().flatten() {
        let normalized_street = normalize(street);
        let score = if !normalized_street.is_empty()
            && !normalized_query.is_empty()
            && normalized_street.contains(&normalized_query)
        {
            ratio(normalized_query.len(), normalized_street.len())
        } else {
            similarity(&normalized_street, &normalized_query)
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((street, score));
        }
    }
    best.filter(|(_, score)| *score >= MIN_STREET_SCORE)
        .map(|(street, _)| street.clone())
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}
