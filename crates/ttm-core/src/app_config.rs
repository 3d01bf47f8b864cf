use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Name of the key-value file kept inside [`AppConfig::data_dir`].
pub const STORE_FILE_NAME: &str = "ttm-store.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory holding the persisted route and user street layer.
    pub data_dir: PathBuf,
    /// Optional YAML file replacing the bundled baseline gazetteer.
    pub gazetteer_path: Option<PathBuf>,
    /// Village used when no city can be resolved for an address.
    pub default_city: String,
    /// Route origin used when none has been saved.
    pub origin: String,
}

impl AppConfig {
    /// Full path of the JSON key-value file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}
