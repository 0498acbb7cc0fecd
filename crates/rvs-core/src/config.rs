use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::{ConfigError, LocationSet};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load configuration for offline tools that never open a listener.
///
/// `RVS_BIND_ADDR` and `PORT` are ignored, so a bad server address cannot
/// block scoring or querying. `bind_addr` holds the default.
///
/// # Errors
///
/// Returns `ConfigError` if any other value is present but invalid.
pub fn load_offline_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_offline_config(|key| std::env::var(key))
}

fn build_offline_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    build_app_config(|key| match key {
        "RVS_BIND_ADDR" | "PORT" => Err(std::env::VarError::NotPresent),
        _ => lookup(key),
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, raw: &str| -> Result<SocketAddr, ConfigError> {
        raw.parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let bind_addr = match (lookup("RVS_BIND_ADDR"), lookup("PORT")) {
        (Ok(raw), _) => parse_addr("RVS_BIND_ADDR", &raw)?,
        (Err(_), Ok(port)) => {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| invalid("PORT", e.to_string()))?;
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
        }
        (Err(_), Err(_)) => parse_addr("RVS_BIND_ADDR", DEFAULT_BIND_ADDR)?,
    };

    let log_level = or_default("RVS_LOG_LEVEL", "info");
    let data_path = PathBuf::from(or_default("RVS_DATA_PATH", "./data/reviews.csv"));
    let lexicon_path = lookup("RVS_LEXICON_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let allowed_locations = match lookup("RVS_ALLOWED_LOCATIONS") {
        Ok(raw) => {
            let set = LocationSet::parse_list(&raw);
            if set.is_empty() {
                return Err(invalid(
                    "RVS_ALLOWED_LOCATIONS",
                    "must list at least one location".to_string(),
                ));
            }
            set
        }
        Err(_) => LocationSet::default(),
    };

    Ok(AppConfig {
        bind_addr,
        log_level,
        data_path,
        lexicon_path,
        allowed_locations,
    })
}
