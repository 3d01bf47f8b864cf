use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A leading house number: 1-3 digits followed by whitespace.
static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,3})\s+(.*)$").expect("valid house number regex"));

/// Split `"16 Rue du Parc"` into `(Some("16"), "Rue du Parc")`.
///
/// Lines without a leading 1-3 digit number come back whole (trimmed).
#[must_use]
pub fn split_house_number(line: &str) -> (Option<String>, String) {
    match HOUSE_NUMBER.captures(line) {
        Some(caps) => (
            Some(caps[1].to_string()),
            caps[2].trim().to_string(),
        ),
        None => (None, line.trim().to_string()),
    }
}

/// Structured address. `street` never contains the house number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
}

impl Address {
    /// Build from a free-form address line and optional city.
    #[must_use]
    pub fn from_line(line: &str, city: Option<&str>) -> Self {
        let (house_number, street) = split_house_number(line);
        Self {
            house_number,
            street: Some(street).filter(|s| !s.is_empty()),
            city: city.map(str::trim).filter(|c| !c.is_empty()).map(String::from),
        }
    }

    /// Rejoin house number and street: `"16 Rue du Parc"`.
    #[must_use]
    pub fn line(&self) -> String {
        [self.house_number.as_deref(), self.street.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Loosely filled address as typed or extracted: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAddress {
    pub address: Option<String>,
    pub city: Option<String>,
}

impl PartialAddress {
    #[must_use]
    pub fn new(address: Option<&str>, city: Option<&str>) -> Self {
        Self {
            address: address.map(String::from),
            city: city.map(String::from),
        }
    }

    /// Fields of `other` that are set and non-blank override `self`.
    #[must_use]
    pub fn merge(self, other: PartialAddress) -> Self {
        let pick = |mine: Option<String>, theirs: Option<String>| {
            theirs.filter(|v| !v.trim().is_empty()).or(mine)
        };
        Self {
            address: pick(self.address, other.address),
            city: pick(self.city, other.city),
        }
    }
}

/// A gazetteer street scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub city: String,
    pub street: String,
    /// Similarity in `[0, 1]`.
    pub score: f64,
}

/// One delivery destination on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub id: Uuid,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Normalized `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Stop {
    /// New stop with a freshly generated id.
    #[must_use]
    pub fn new(address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
            city: city.into(),
            phone: None,
            time: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = non_blank(phone);
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: Option<String>) -> Self {
        self.time = non_blank(time);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = non_blank(notes);
        self
    }

    /// Apply an in-place edit. The id never changes.
    pub fn apply(&mut self, patch: StopPatch) {
        if let Some(address) = patch.address {
            self.address = address.trim().to_string();
        }
        if let Some(city) = patch.city {
            self.city = city.trim().to_string();
        }
        if patch.phone.is_some() {
            self.phone = non_blank(patch.phone);
        }
        if patch.time.is_some() {
            self.time = non_blank(patch.time);
        }
        if patch.notes.is_some() {
            self.notes = non_blank(patch.notes);
        }
    }
}

/// Field edits for a [`Stop`]. `None` leaves a field untouched; a blank
/// value clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopPatch {
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// How the route is ordered when presented and exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    #[default]
    Manual,
    Time,
}

impl OrderMode {
    /// Anything other than `"time"` is manual ordering.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim() == "time" {
            OrderMode::Time
        } else {
            OrderMode::Manual
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderMode::Manual => "manual",
            OrderMode::Time => "time",
        }
    }
}

impl std::fmt::Display for OrderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
