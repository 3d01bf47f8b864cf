//! Street/city resolution with disambiguation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use ttm_core::{
    split_house_number, Address, Candidate, KeyValueStore, PartialAddress, Stop, StoreError,
    StreetIndex,
};

use crate::fuzzy::similarity;
use crate::gazetteer::Gazetteer;
use crate::suggest::suggest_streets;

/// Candidates scoring below this are OCR/speech noise.
pub const MIN_CANDIDATE_SCORE: f64 = 0.75;
pub const MAX_CANDIDATES: usize = 3;
/// A lone candidate above this score decides the city on its own.
pub const AUTO_ACCEPT_SCORE: f64 = 0.85;

static HOUSE_NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}\b").expect("valid house number token regex"));

/// Score every street in `index` against `street_guess`, keep those at or
/// above [`MIN_CANDIDATE_SCORE`], best first, at most [`MAX_CANDIDATES`].
///
/// Equal scores keep index order (cities alphabetically, then street order).
#[must_use]
pub fn rank_candidates(index: &StreetIndex, street_guess: &str) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = index
        .iter()
        .flat_map(|(city, streets)| {
            streets.iter().map(move |street| Candidate {
                city: city.clone(),
                street: street.clone(),
                score: similarity(street_guess, street),
            })
        })
        .filter(|c| c.score >= MIN_CANDIDATE_SCORE)
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Overall confidence in a completed address, clamped to `[0, 1]`.
///
/// `+0.5` known city, `+0.2` house number present, `+0.4` strong top
/// candidate, `-0.3` when more than one candidate competes.
#[must_use]
pub fn score_address(address: &str, city_known: bool, candidates: &[Candidate]) -> f64 {
    let mut score: f64 = 0.0;
    if city_known {
        score += 0.5;
    }
    if HOUSE_NUMBER_TOKEN.is_match(address) {
        score += 0.2;
    }
    if candidates.first().is_some_and(|c| c.score >= AUTO_ACCEPT_SCORE) {
        score += 0.4;
    }
    if candidates.len() > 1 {
        score -= 0.3;
    }
    score.clamp(0.0, 1.0)
}

/// Result of [`Resolver::auto_complete_address`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub address: String,
    /// Never empty: falls back to the default city.
    pub city: String,
    pub candidates: Vec<Candidate>,
    /// More than one plausible city; the caller should ask the user.
    pub needs_disambiguation: bool,
    /// The city was taken from a single strong street match.
    pub inferred: bool,
    pub score: f64,
}

/// A stop as entered by hand, before its city is completed. Carries no id;
/// one is assigned when the stop is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopDraft {
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

pub struct Resolver<S> {
    gazetteer: Gazetteer<S>,
    default_city: String,
}

impl<S: KeyValueStore> Resolver<S> {
    pub fn new(gazetteer: Gazetteer<S>, default_city: impl Into<String>) -> Self {
        Self {
            gazetteer,
            default_city: default_city.into(),
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer<S> {
        &self.gazetteer
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Current merged street index (baseline plus user layer).
    pub fn street_index(&self) -> StreetIndex {
        self.gazetteer.load()
    }

    pub fn resolve_city_from_street(&self, street_guess: &str) -> Vec<Candidate> {
        let candidates = rank_candidates(&self.gazetteer.load(), street_guess);
        tracing::debug!(
            street = street_guess,
            candidates = candidates.len(),
            "resolved street candidates"
        );
        candidates
    }

    /// Fill in the city of a partial address.
    ///
    /// A known village is kept (in its dataset spelling) and no inference
    /// runs. Otherwise the street text, minus any house number, is matched
    /// against the gazetteer: one strong candidate sets the city, several
    /// candidates flag disambiguation. An empty city falls back to the
    /// default city.
    pub fn auto_complete_address(&self, partial: PartialAddress) -> Completion {
        let address = partial.address.unwrap_or_default().trim().to_string();
        let typed_city = partial.city.unwrap_or_default().trim().to_string();

        let known = self.gazetteer.canonical_village(&typed_city).map(str::to_string);
        let city_given = known.is_some();
        let mut city = known.unwrap_or(typed_city);

        let mut candidates = Vec::new();
        let mut needs_disambiguation = false;
        let mut inferred = false;

        if !city_given && !address.is_empty() {
            let (_, street) = split_house_number(&address);
            candidates = self.resolve_city_from_street(&street);
            match candidates.as_slice() {
                [only] if only.score > AUTO_ACCEPT_SCORE => {
                    city.clone_from(&only.city);
                    inferred = true;
                }
                [_, _, ..] => needs_disambiguation = true,
                _ => {}
            }
        }

        if city.is_empty() {
            city.clone_from(&self.default_city);
        }

        let score = score_address(
            &address,
            self.gazetteer.is_known_village(&city),
            &candidates,
        );
        tracing::debug!(
            city = %city,
            inferred,
            needs_disambiguation,
            score,
            "completed address"
        );

        Completion {
            address,
            city,
            candidates,
            needs_disambiguation,
            inferred,
            score,
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the user layer cannot be written.
    pub fn add_user_street(&mut self, city: &str, street: &str) -> Result<bool, StoreError> {
        self.gazetteer.add_user_street(city, street)
    }

    pub fn is_known_village(&self, name: &str) -> bool {
        self.gazetteer.is_known_village(name)
    }

    /// Record the user's pick from a disambiguation list and return its city.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the user layer cannot be written.
    pub fn confirm_candidate(&mut self, candidate: &Candidate) -> Result<String, StoreError> {
        self.gazetteer
            .add_user_street(&candidate.city, &candidate.street)?;
        Ok(candidate.city.clone())
    }

    /// Complete a hand-entered stop and learn its street under the final city.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the learned street cannot be persisted.
    pub fn submit_stop(&mut self, draft: StopDraft) -> Result<Stop, StoreError> {
        let completion = self.auto_complete_address(PartialAddress {
            address: Some(draft.address),
            city: draft.city,
        });
        let stop = Stop::new(completion.address, completion.city)
            .with_phone(draft.phone)
            .with_time(draft.time)
            .with_notes(draft.notes);

        let parts = Address::from_line(&stop.address, Some(&stop.city));
        if let (Some(city), Some(street)) = (&parts.city, &parts.street) {
            self.gazetteer.add_user_street(city, street)?;
        }
        Ok(stop)
    }

    /// Street suggestions for `query`, scoped to `city` when it has streets.
    pub fn suggest_streets(&self, city: Option<&str>, query: &str, limit: usize) -> Vec<String> {
        suggest_streets(&self.gazetteer.load(), city, query, limit)
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
