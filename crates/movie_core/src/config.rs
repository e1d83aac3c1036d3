//! Application configuration with environment overrides.
//!
//! # Responsibility
//! - Hold paths, lookup settings and validation bounds in one place.
//! - Apply overrides from environment variables.
//!
//! # Invariants
//! - A blank `OMDB_API_KEY` is treated as no credential.
//! - Invalid override values are rejected, never silently ignored.

use crate::logging::default_log_level;
use crate::lookup::omdb::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_OMDB_URL};
use crate::model::movie::ValidationLimits;
use crate::render::DEFAULT_PAGE_TITLE;
use std::collections::HashMap;
use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_KEY: &str = "OMDB_API_KEY";
pub const ENV_API_URL: &str = "OMDB_API_URL";
pub const ENV_DB_PATH: &str = "MOVIES_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MOVIES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MOVIES_LOG_DIR";
pub const ENV_LOOKUP_TIMEOUT_SECS: &str = "MOVIES_LOOKUP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Runtime settings for the catalog application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub page_title: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub lookup_timeout: Duration,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub limits: ValidationLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/movies.db"),
            template_path: PathBuf::from("_static/index_template.html"),
            output_path: PathBuf::from("_static/index.html"),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            api_key: None,
            api_url: DEFAULT_OMDB_URL.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            log_level: default_log_level().to_string(),
            log_dir: PathBuf::from("data/logs"),
            limits: ValidationLimits::default(),
        }
    }
}

impl AppConfig {
    /// Builds a config from defaults plus the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(&utf8_vars(std::env::vars_os()))
    }

    /// Builds a config from defaults plus the given variables.
    pub fn from_env_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        config.api_key = get(ENV_API_KEY).map(str::to_string);
        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url.to_string();
        }
        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level.to_string();
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get(ENV_LOOKUP_TIMEOUT_SECS) {
            let parsed = secs
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_LOOKUP_TIMEOUT_SECS,
                    value: secs.to_string(),
                })?;
            config.lookup_timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }
}

fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        utf8_vars, AppConfig, ConfigError, ENV_API_KEY, ENV_DB_PATH, ENV_LOOKUP_TIMEOUT_SECS,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn defaults_point_at_data_and_static_dirs() {
        let config = AppConfig::from_env_map(&HashMap::new()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("data/movies.db"));
        assert_eq!(config.output_path, PathBuf::from("_static/index.html"));
        assert_eq!(config.api_key, None);
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
        assert_eq!(config.limits.min_year, 1888);
    }

    #[test]
    fn blank_api_key_means_no_credential() {
        let config = AppConfig::from_env_map(&vars(&[(ENV_API_KEY, "  ")])).unwrap();
        assert_eq!(config.api_key, None);

        let config = AppConfig::from_env_map(&vars(&[(ENV_API_KEY, "abc123")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn overrides_apply_and_bad_timeout_is_rejected() {
        let config = AppConfig::from_env_map(&vars(&[
            (ENV_DB_PATH, "/tmp/catalog.db"),
            (ENV_LOOKUP_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.lookup_timeout, Duration::from_secs(3));

        let err = AppConfig::from_env_map(&vars(&[(ENV_LOOKUP_TIMEOUT_SECS, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_LOOKUP_TIMEOUT_SECS,
                value: "0".to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_environment_entries_are_skipped() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let collected = utf8_vars(vec![
            (OsString::from(ENV_DB_PATH), OsString::from("/tmp/catalog.db")),
            (OsString::from(ENV_API_KEY), OsString::from_vec(vec![0x66, 0xff, 0x6f])),
            (OsString::from_vec(vec![0xfe, 0x41]), OsString::from("x")),
        ]);
        assert_eq!(collected.len(), 1);

        let config = AppConfig::from_env_map(&collected).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.api_key, None);
    }
}
