//! Two-layer street gazetteer.
//!
//! The baseline dataset is immutable; the user layer lives behind a
//! [`KeyValueStore`] under [`USER_STREETS_KEY`] and is re-read on every
//! [`Gazetteer::load`]. Writes are read-merge-write, last writer wins.

use std::collections::HashSet;

use ttm_core::{
    read_json, write_json, GazetteerData, KeyValueStore, StoreError, StreetIndex,
    USER_STREETS_KEY,
};

use crate::fuzzy::normalize;

/// Merge a user layer into a copy of the baseline. Streets keep their
/// first-seen order; user streets equal to an earlier one after
/// [`normalize`] are dropped.
#[must_use]
pub fn merge_layers(baseline: &StreetIndex, user: &StreetIndex) -> StreetIndex {
    let mut merged = baseline.clone();
    for (city, streets) in user {
        let entry = merged.entry(city.clone()).or_default();
        let mut seen: HashSet<String> = entry.iter().map(|s| normalize(s)).collect();
        for street in streets {
            if seen.insert(normalize(street)) {
                entry.push(street.clone());
            }
        }
    }
    merged
}

pub struct Gazetteer<S> {
    baseline: GazetteerData,
    normalized_villages: Vec<String>,
    store: S,
}

impl<S: KeyValueStore> Gazetteer<S> {
    pub fn new(baseline: GazetteerData, store: S) -> Self {
        let normalized_villages = baseline.villages.iter().map(|v| normalize(v)).collect();
        Self {
            baseline,
            normalized_villages,
            store,
        }
    }

    /// The fixed village list, in dataset order.
    pub fn villages(&self) -> &[String] {
        &self.baseline.villages
    }

    /// Current user layer. Unreadable or malformed state reads as empty.
    pub fn user_streets(&self) -> StreetIndex {
        match read_json::<StreetIndex, _>(&self.store, USER_STREETS_KEY) {
            Ok(layer) => layer.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "user street layer unreadable, using baseline only");
                StreetIndex::new()
            }
        }
    }

    /// Baseline merged with the current user layer.
    pub fn load(&self) -> StreetIndex {
        merge_layers(&self.baseline.streets, &self.user_streets())
    }

    /// Record a confirmed street under `city`. The city is not checked
    /// against the village list.
    ///
    /// Returns `Ok(false)` when nothing changed: blank input, or the street
    /// already in the user layer for that city up to [`normalize`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the user layer cannot be read or written.
    /// A failed read never falls through to a write.
    pub fn add_user_street(&mut self, city: &str, street: &str) -> Result<bool, StoreError> {
        let city = city.trim();
        let street = street.trim();
        if city.is_empty() || street.is_empty() {
            return Ok(false);
        }

        let mut layer =
            read_json::<StreetIndex, _>(&self.store, USER_STREETS_KEY)?.unwrap_or_default();
        let needle = normalize(street);
        let entry = layer.entry(city.to_string()).or_default();
        if entry.iter().any(|s| normalize(s) == needle) {
            return Ok(false);
        }
        entry.push(street.to_string());
        write_json(&mut self.store, USER_STREETS_KEY, &layer)?;
        tracing::info!(city, street, "learned user street");
        Ok(true)
    }

    /// Exact match after normalization, never fuzzy.
    pub fn is_known_village(&self, name: &str) -> bool {
        self.canonical_village(name).is_some()
    }

    /// Dataset spelling of a known village, e.g. `"trepail"` -> `"Trépail"`.
    pub fn canonical_village(&self, name: &str) -> Option<&str> {
        let needle = normalize(name);
        if needle.is_empty() {
            return None;
        }
        self.normalized_villages
            .iter()
            .position(|v| *v == needle)
            .map(|i| self.baseline.villages[i].as_str())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "gazetteer_test.rs"]
mod tests;
