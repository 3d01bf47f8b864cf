use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_CITY: &str = "Verzenay";
pub const DEFAULT_ORIGIN: &str = "Rue de la Crayère, Verzenay";

/// Load application configuration from environment variables already in the process.
///
/// Does NOT load `.env` files; the binary does that before calling this.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let non_blank = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value must not be blank".to_string(),
            });
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("TTM_ENV", "development"));
    let log_level = or_default("TTM_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("TTM_DATA_DIR", "./data"));
    let gazetteer_path = lookup("TTM_GAZETTEER_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let default_city = non_blank("TTM_DEFAULT_CITY", DEFAULT_CITY)?;
    let origin = non_blank("TTM_ORIGIN", DEFAULT_ORIGIN)?;

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        gazetteer_path,
        default_city,
        origin,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
