//! Runtime configuration read from the environment.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::offline::QUIZ_DATA_PATH;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_CACHE_DB: &str = "sqlite://quiz-cache.sqlite3";
pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub base_url: Url,
    pub data_path: String,
    pub cache_db: String,
    pub auto_advance: Duration,
    pub offline: bool,
    pub log_json: bool,
}

impl QuizConfig {
    /// Read `QUIZ_*` variables, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `QUIZ_BASE_URL` or `QUIZ_AUTO_ADVANCE_MS` is set
    /// but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup("QUIZ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(parse_base_url(&base)?);
        if let Some(path) = lookup("QUIZ_DATA_PATH") {
            config.data_path = path;
        }
        if let Some(db) = lookup("QUIZ_CACHE_DB") {
            config.cache_db = db;
        }
        if let Some(raw) = lookup("QUIZ_AUTO_ADVANCE_MS") {
            config = config.with_auto_advance_ms(&raw)?;
        }
        config.offline = parse_flag(lookup("QUIZ_OFFLINE").as_deref(), true);
        config.log_json = parse_flag(lookup("QUIZ_LOG_JSON").as_deref(), false);
        Ok(config)
    }

    /// Defaults for everything but the app base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            data_path: QUIZ_DATA_PATH.to_string(),
            cache_db: DEFAULT_CACHE_DB.to_string(),
            auto_advance: Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS),
            offline: true,
            log_json: false,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `raw` is not an absolute URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDelay` if `raw` is not a number of milliseconds.
    pub fn with_auto_advance_ms(mut self, raw: &str) -> Result<Self, ConfigError> {
        let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidDelay {
            raw: raw.to_string(),
        })?;
        self.auto_advance = Duration::from_millis(ms);
        Ok(self)
    }

    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    #[must_use]
    pub fn with_cache_db(mut self, db: impl Into<String>) -> Self {
        self.cache_db = db.into();
        self
    }

    #[must_use]
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// A trailing slash is added so relative asset paths resolve under the base.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_string(),
        source,
    })
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some("1" | "true" | "TRUE" | "yes" | "YES") => true,
        Some("0" | "false" | "FALSE" | "no" | "NO") => false,
        _ => default,
    }
}
