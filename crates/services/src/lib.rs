#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod offline;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::QuizConfig;
pub use error::{AppServicesError, ConfigError, LoadError, QuizError, TransportError, WorkerError};
pub use fetch::{FetchedResponse, Fetcher, HttpFetcher, ResourceRequest, ResponseKind};
pub use loader::{QuizLoader, QuizSource};
pub use offline::{CacheManifest, OfflineWorker, WorkerState};
pub use sessions::{BootOutcome, QuizLoopService, QuizService, QuizStatus};
