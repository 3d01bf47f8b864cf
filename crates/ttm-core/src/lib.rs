pub mod app_config;
pub mod config;
pub mod gazetteer_data;
pub mod kv;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config_from_env, DEFAULT_CITY, DEFAULT_ORIGIN};
pub use gazetteer_data::{
    baseline_gazetteer, load_gazetteer, parse_gazetteer, GazetteerData, StreetIndex,
};
pub use kv::{
    read_json, write_json, KeyValueStore, MemoryStore, StoreError, MODE_KEY, ORIGIN_KEY, STOPS_KEY,
    USER_STREETS_KEY,
};
pub use types::{
    split_house_number, Address, Candidate, OrderMode, PartialAddress, Stop, StopPatch,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read gazetteer file {path}: {source}")]
    GazetteerFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gazetteer YAML: {0}")]
    GazetteerFileParse(#[source] serde_yaml::Error),

    #[error("gazetteer validation failed: {0}")]
    Validation(String),
}
