//! Mapping configuration.
//!
//! [`MappingConfig`] holds the knobs the generator and the record access facade
//! consult: the store's representable date range, the identity retrieval query,
//! the key sentinel written after a failed insert, and whether writes go through
//! parameter binding. Applications load it from `config/config.toml` (section
//! `[mapping]`) or `MOORING__MAPPING__*` environment variables with
//! [`MappingConfig::load()`], then optionally [`MappingConfig::install()`] it as the
//! process-wide default.

use chrono::{NaiveDate, NaiveDateTime};
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;

const CONFIG_FILE: &str = "config/config.toml";

static GLOBAL: OnceCell<Arc<MappingConfig>> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MappingConfig {
    /// Smallest date the store accepts; also the hydration default for absent dates
    #[serde(default = "default_sql_min_date")]
    pub sql_min_date: NaiveDate,
    /// Largest date the store accepts
    #[serde(default = "default_sql_max_date")]
    pub sql_max_date: NaiveDate,
    /// Statement appended to identity inserts to read back the generated key
    #[serde(default = "default_identity_query")]
    pub identity_query: String,
    /// Written into the primary key when an insert yields no identity
    #[serde(default = "default_invalid_key_sentinel")]
    pub invalid_key_sentinel: i64,
    /// Route INSERT/UPDATE/DELETE through parameter binding instead of literals
    #[serde(default)]
    pub parameterize_writes: bool,
    /// Carried for executors; the mapping engine itself never times out
    #[serde(default = "default_command_timeout_seconds")]
    pub command_timeout_seconds: u64,
}

fn default_sql_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1753, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_sql_max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn default_identity_query() -> String {
    "SELECT SCOPE_IDENTITY();".to_string()
}

fn default_invalid_key_sentinel() -> i64 {
    -1
}

fn default_command_timeout_seconds() -> u64 {
    600
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            sql_min_date: default_sql_min_date(),
            sql_max_date: default_sql_max_date(),
            identity_query: default_identity_query(),
            invalid_key_sentinel: default_invalid_key_sentinel(),
            parameterize_writes: false,
            command_timeout_seconds: default_command_timeout_seconds(),
        }
    }
}

impl MappingConfig {
    /// Load the mapping configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[mapping]` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env_source());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder().add_source(env_source()).build().map_err(|env_err| {
                    ConfigError::Message(format!(
                        "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                    ))
                })?
            }
        };

        match settings.get::<MappingConfig>("mapping") {
            Ok(cfg) => cfg.validated(),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Mapping configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }

    /// Install `config` as the process-wide default.
    ///
    /// Fails (handing the config back) if a default was already installed or read.
    pub fn install(config: MappingConfig) -> Result<(), MappingConfig> {
        GLOBAL
            .set(Arc::new(config))
            .map_err(|rejected| Arc::try_unwrap(rejected).unwrap_or_else(|arc| (*arc).clone()))
    }

    /// The process-wide configuration; defaults unless one was installed first
    pub fn global() -> &'static MappingConfig {
        GLOBAL.get_or_init(|| Arc::new(Self::default()))
    }

    /// Shared handle to the process-wide configuration
    pub fn shared() -> Arc<MappingConfig> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::default())))
    }

    /// `sql_min_date` at midnight
    #[must_use]
    pub fn min_datetime(&self) -> NaiveDateTime {
        self.sql_min_date.and_time(chrono::NaiveTime::MIN)
    }

    /// `sql_max_date` at midnight
    #[must_use]
    pub fn max_datetime(&self) -> NaiveDateTime {
        self.sql_max_date.and_time(chrono::NaiveTime::MIN)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.sql_min_date > self.sql_max_date {
            return Err(ConfigError::Message(format!(
                "mapping.sql_min_date ({}) is after mapping.sql_max_date ({})",
                self.sql_min_date, self.sql_max_date
            )));
        }
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MOORING").separator("__").try_parsing(true)
}
