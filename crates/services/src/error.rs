//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::{PayloadError, SessionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// A resource could not be obtained at all (network or file system).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("invalid resource url `{raw}`: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("resource unreachable: {0}")]
    Unreachable(String),
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `QuizLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("quiz data could not be fetched: {0}")]
    Transport(#[from] TransportError),
    #[error("quiz data request failed with HTTP status {0}")]
    HttpStatus(u16),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl LoadError {
    /// True when the data never arrived, as opposed to arriving malformed.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus(_))
    }
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions have been loaded")]
    NoQuestions,
    #[error("the quiz has not been started")]
    NotStarted,
    #[error("option {0} does not exist")]
    InvalidOption(u8),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `OfflineWorker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkerError {
    #[error("invalid asset path `{path}`: {source}")]
    InvalidAsset {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to fetch {url} during install: {source}")]
    Install {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("install request for {url} returned status {status}")]
    InstallStatus { url: String, status: u16 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url `{raw}`: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid auto-advance delay `{raw}` (expected milliseconds)")]
    InvalidDelay { raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}
