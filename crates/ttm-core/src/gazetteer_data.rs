//! Gazetteer dataset: the fixed list of delivery villages and the baseline
//! street index shipped with the application.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Baseline dataset compiled into the binary.
const BUNDLED_GAZETTEER: &str = include_str!("../../../config/gazetteer.yaml");

/// City name to known street names.
pub type StreetIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerData {
    /// Villages the driver serves. Only these count as "known" cities.
    pub villages: Vec<String>,
    #[serde(default)]
    pub streets: StreetIndex,
}

/// Parse the bundled baseline gazetteer.
///
/// # Errors
///
/// Returns `ConfigError` if the bundled YAML is malformed or fails validation.
pub fn baseline_gazetteer() -> Result<GazetteerData, ConfigError> {
    parse_gazetteer(BUNDLED_GAZETTEER)
}

/// Load and validate a gazetteer from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_gazetteer(path: &Path) -> Result<GazetteerData, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::GazetteerFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_gazetteer(&content)
}

/// Parse and validate gazetteer YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_gazetteer(content: &str) -> Result<GazetteerData, ConfigError> {
    let data: GazetteerData =
        serde_yaml::from_str(content).map_err(ConfigError::GazetteerFileParse)?;
    validate_gazetteer(&data)?;
    Ok(data)
}

fn validate_gazetteer(data: &GazetteerData) -> Result<(), ConfigError> {
    let mut seen_villages = HashSet::new();

    for village in &data.villages {
        if village.trim().is_empty() {
            return Err(ConfigError::Validation(
                "village name must be non-empty".to_string(),
            ));
        }
        if !seen_villages.insert(village.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate village: '{village}'"
            )));
        }
    }

    for (city, streets) in &data.streets {
        if city.trim().is_empty() {
            return Err(ConfigError::Validation(
                "street index contains an empty city key".to_string(),
            ));
        }
        if let Some(blank) = streets.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "city '{city}' has an empty street name at position {blank}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "gazetteer_data_test.rs"]
mod tests;
