//! Configuration loading for the gridportal API.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `GRIDPORTAL_`, producing a typed [`AppConfig`].

use std::{collections::BTreeMap, env, net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application configuration derived from `GRIDPORTAL_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    /// Upper bound for any single query; exceeding it is a reported
    /// `QueryTimeout`, never a crash.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Trailing window for "latest reading" telemetry queries, in hours.
    #[serde(default = "default_telemetry_window_hours")]
    pub telemetry_window_hours: u32,
    /// Trailing window for daily DTR consumption sums, in days.
    #[serde(default = "default_consumption_window_days")]
    pub consumption_window_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_bind_addr: default_api_bind_addr(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            telemetry_window_hours: default_telemetry_window_hours(),
            consumption_window_days: default_consumption_window_days(),
        }
    }
}

impl AppConfig {
    /// Parse the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.api_bind_addr.parse()
    }

    /// Serialize the configuration for startup logging. The current schema
    /// carries no secrets, so this is a plain serialization.
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Validate bounds that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr().is_err() {
            return Err(ConfigError::InvalidBindAddr {
                value: self.api_bind_addr.clone(),
            });
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::InvalidQueryTimeout {
                value: self.query_timeout_ms,
            });
        }
        if self.telemetry_window_hours == 0 || self.telemetry_window_hours > 168 {
            return Err(ConfigError::InvalidTelemetryWindow {
                value: self.telemetry_window_hours,
            });
        }
        if self.consumption_window_days == 0 || self.consumption_window_days > 366 {
            return Err(ConfigError::InvalidConsumptionWindow {
                value: self.consumption_window_days,
            });
        }
        Ok(())
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_api_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_query_timeout_ms() -> u64 {
    10_000
}

fn default_telemetry_window_hours() -> u32 {
    24
}

fn default_consumption_window_days() -> u32 {
    62
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("invalid bind address: {value}")]
    InvalidBindAddr { value: String },
    #[error("query timeout must be greater than zero, got {value}")]
    InvalidQueryTimeout { value: u64 },
    #[error("telemetry window must be 1-168 hours, got {value}")]
    InvalidTelemetryWindow { value: u32 },
    #[error("consumption window must be 1-366 days, got {value}")]
    InvalidConsumptionWindow { value: u32 },
}

/// Loads configuration using layered `.env` files and `GRIDPORTAL_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads configuration: `.env` < `.env.local` < `.env.<profile>` <
    /// `.env.<profile>.local` < process environment.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix("GRIDPORTAL_") {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let api_bind_addr = layered
            .remove("API_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api_bind_addr);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let database_url = layered
            .remove("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_database_url);
        let db_max_connections = layered
            .remove("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = layered
            .remove("DB_ACQUIRE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_acquire_timeout_ms);
        let query_timeout_ms = layered
            .remove("QUERY_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_query_timeout_ms);
        let telemetry_window_hours = layered
            .remove("TELEMETRY_WINDOW_HOURS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_telemetry_window_hours);
        let consumption_window_days = layered
            .remove("CONSUMPTION_WINDOW_DAYS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_consumption_window_days);

        let config = AppConfig {
            profile,
            api_bind_addr,
            log_level,
            log_format,
            database_url,
            db_max_connections,
            db_acquire_timeout_ms,
            query_timeout_ms,
            telemetry_window_hours,
            consumption_window_days,
        };

        config.validate()?;

        Ok(config)
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var("GRIDPORTAL_PROFILE")
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix("GRIDPORTAL_") {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.telemetry_window_hours, 24);
        assert_eq!(config.consumption_window_days, 62);
        config.bind_addr().expect("default bind addr parses");
    }

    #[test]
    fn zero_query_timeout_is_rejected() {
        let config = AppConfig {
            query_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueryTimeout { value: 0 })
        ));
    }

    #[test]
    fn out_of_range_windows_are_rejected() {
        let config = AppConfig {
            telemetry_window_hours: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            consumption_window_days: 400,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let config = AppConfig {
            api_bind_addr: "not-an-addr".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
    }
}
