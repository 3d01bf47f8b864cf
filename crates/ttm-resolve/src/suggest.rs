//! Street suggestions for typed or dictated partial street names.

use std::cmp::Ordering;

use ttm_core::StreetIndex;

use crate::fuzzy::{normalize, similarity};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

const PREFIX_BONUS: f64 = 0.15;
const MIN_SUGGESTION_SCORE: f64 = 0.5;

/// Streets of `city` ranked against `query`. When the city is unknown or has
/// no streets, every street in the index is considered.
///
/// Scores are `similarity + 0.15` for prefix matches; only scores above 0.5
/// are kept. Names are de-duplicated before truncating to `limit`.
#[must_use]
pub fn suggest_streets(
    index: &StreetIndex,
    city: Option<&str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let pool: Vec<&String> = match city.and_then(|c| index.get(c.trim())) {
        Some(streets) if !streets.is_empty() => streets.iter().collect(),
        _ => index.values().flatten().collect(),
    };

    let normalized_query = normalize(query);
    let mut scored: Vec<(&String, f64)> = pool
        .into_iter()
        .map(|street| {
            let bonus = if normalize(street).starts_with(&normalized_query) {
                PREFIX_BONUS
            } else {
                0.0
            };
            (street, similarity(query, street) + bonus)
        })
        .filter(|(_, score)| *score > MIN_SUGGESTION_SCORE)
        .collect();
    scored.sort_by(|a, b| descending(a.1, b.1));

    let mut out: Vec<String> = Vec::new();
    for (street, _) in scored {
        if out.len() == limit {
            break;
        }
        if !out.contains(street) {
            out.push(street.clone());
        }
    }
    out
}

/// Rank one city's streets for a combobox-style lookup.
///
/// An empty query returns the first `limit` streets unchanged. Otherwise
/// prefix matches get `+0.3`, substring matches `+0.1`, and anything ranked
/// at or below 0.15 is dropped.
#[must_use]
pub fn rank_city_streets(streets: &[String], query: &str, limit: usize) -> Vec<String> {
    if query.is_empty() {
        return streets.iter().take(limit).cloned().collect();
    }

    let normalized_query = normalize(query);
    let mut ranked: Vec<(&String, f64)> = streets
        .iter()
        .map(|street| {
            let normalized_street = normalize(street);
            let mut rank = similarity(&normalized_street, &normalized_query);
            if normalized_street.starts_with(&normalized_query) {
                rank += 0.3;
            } else if normalized_street.contains(&normalized_query) {
                rank += 0.1;
            }
            (street, rank)
        })
        .filter(|(_, rank)| *rank > 0.15)
        .collect();
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(street, _)| street.clone())
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
