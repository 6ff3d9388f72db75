//! Quiz Data Loader: fetches or reads question data and validates it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use quiz_core::{PayloadError, QuestionSet, parse_payload};

use crate::error::{LoadError, TransportError};
use crate::fetch::{Fetcher, ResourceRequest};

/// Where question data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// A JSON resource relative to the app base URL.
    Remote { path: String },
    /// Raw text supplied by the caller.
    Local { text: String },
    /// A file on disk, read as UTF-8.
    LocalFile { path: PathBuf },
}

impl QuizSource {
    #[must_use]
    pub fn remote(path: impl Into<String>) -> Self {
        Self::Remote { path: path.into() }
    }

    #[must_use]
    pub fn local(text: impl Into<String>) -> Self {
        Self::Local { text: text.into() }
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::LocalFile { path: path.into() }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Local { .. } => "local",
            Self::LocalFile { .. } => "file",
        }
    }
}

/// Loads and validates question sets. Both sources share one validation path.
#[derive(Clone)]
pub struct QuizLoader {
    fetcher: Arc<dyn Fetcher>,
    base_url: Url,
}

impl QuizLoader {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// Load a question set from `source`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Transport` / `LoadError::HttpStatus` when the data
    /// cannot be obtained, and `LoadError::Payload` when it fails validation.
    pub async fn load(&self, source: &QuizSource) -> Result<QuestionSet, LoadError> {
        let result = match source {
            QuizSource::Remote { path } => self.load_remote(path).await,
            QuizSource::Local { text } => parse_payload(text).map_err(LoadError::from),
            QuizSource::LocalFile { path } => {
                let text = read_text_file(path).await?;
                parse_payload(&text).map_err(LoadError::from)
            }
        };

        match &result {
            Ok(set) => {
                tracing::info!(source = source.kind(), questions = set.len(), "quiz data loaded");
            }
            Err(err) => {
                tracing::warn!(source = source.kind(), error = %err, "quiz data load failed");
            }
        }
        result
    }

    async fn load_remote(&self, path: &str) -> Result<QuestionSet, LoadError> {
        let request = ResourceRequest::resolve(&self.base_url, path)?;
        let response = self.fetcher.fetch(&request).await?;
        if !response.is_ok() {
            return Err(LoadError::HttpStatus(response.status));
        }
        let text =
            std::str::from_utf8(&response.body).map_err(|_| PayloadError::MalformedPayload)?;
        Ok(parse_payload(text)?)
    }
}

async fn read_text_file(path: &Path) -> Result<String, TransportError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| TransportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|err| TransportError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
    })
}
