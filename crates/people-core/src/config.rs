//! Process configuration read from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_DATABASE_PATH: &str = "data/people.db";
pub const DEFAULT_AGIFY_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDERIZE_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALIZE_URL: &str = "https://api.nationalize.io";

/// Base URLs of the three name-based prediction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorUrls {
    pub agify: String,
    pub genderize: String,
    pub nationalize: String,
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server port.
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// SQLite database file.
    pub database_path: PathBuf,
    pub predictors: PredictorUrls,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.into(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            predictors: PredictorUrls {
                agify: DEFAULT_AGIFY_URL.into(),
                genderize: DEFAULT_GENDERIZE_URL.into(),
                nationalize: DEFAULT_NATIONALIZE_URL.into(),
            },
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("invalid PORT {:?}: {}", raw, e)))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            predictors: PredictorUrls {
                agify: get("AGIFY_URL").unwrap_or(defaults.predictors.agify),
                genderize: get("GENDERIZE_URL").unwrap_or(defaults.predictors.genderize),
                nationalize: get("NATIONALIZE_URL").unwrap_or(defaults.predictors.nationalize),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database_path, PathBuf::from("data/people.db"));
        assert_eq!(config.predictors.agify, "https://api.agify.io");
        assert_eq!(config.predictors.genderize, "https://api.genderize.io");
        assert_eq!(config.predictors.nationalize, "https://api.nationalize.io");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("DATABASE_PATH", "/tmp/people.db"),
            ("AGIFY_URL", "http://localhost:1/age"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_path, PathBuf::from("/tmp/people.db"));
        assert_eq!(config.predictors.agify, "http://localhost:1/age");
        assert_eq!(config.predictors.genderize, DEFAULT_GENDERIZE_URL);
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config =
            ServiceConfig::from_lookup(lookup_from(&[("PORT", ""), ("LOG_LEVEL", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServiceConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
