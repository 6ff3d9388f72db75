use std::sync::Arc;
use std::time::Duration;

use storage::repository::Storage;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::loader::QuizLoader;
use crate::offline::{CacheManifest, OfflineWorker};
use crate::sessions::QuizLoopService;

/// Assembles the app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    worker: Option<Arc<OfflineWorker>>,
    auto_advance: Duration,
}

impl AppServices {
    /// Build services; with offline mode on, the loader goes through an
    /// installed and activated `OfflineWorker` backed by `SQLite`.
    ///
    /// A failed install is not fatal: the previous install's cache is used
    /// when present, otherwise the app runs network-only.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the cache database cannot be opened or
    /// stale caches cannot be removed.
    pub async fn bootstrap(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let network: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.base_url.clone()));

        let worker = if config.offline {
            let storage = Storage::sqlite(&config.cache_db).await?;
            Some(Arc::new(
                start_worker(config, storage, Arc::clone(&network), clock).await?,
            ))
        } else {
            None
        };

        let fetcher: Arc<dyn Fetcher> = match &worker {
            Some(worker) if worker.is_controlling() => Arc::clone(worker) as Arc<dyn Fetcher>,
            _ => network,
        };
        Ok(Self::from_parts(config, fetcher, worker))
    }

    /// Wire services over an explicit fetcher, e.g. a fake in tests.
    #[must_use]
    pub fn from_parts(
        config: &QuizConfig,
        fetcher: Arc<dyn Fetcher>,
        worker: Option<Arc<OfflineWorker>>,
    ) -> Self {
        let loader = Arc::new(QuizLoader::new(fetcher, config.base_url.clone()));
        Self {
            quiz_loop: Arc::new(QuizLoopService::new(loader, config.data_path.clone())),
            worker,
            auto_advance: config.auto_advance,
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn worker(&self) -> Option<Arc<OfflineWorker>> {
        self.worker.clone()
    }

    #[must_use]
    pub fn auto_advance(&self) -> Duration {
        self.auto_advance
    }
}

async fn start_worker(
    config: &QuizConfig,
    storage: Storage,
    network: Arc<dyn Fetcher>,
    clock: Clock,
) -> Result<OfflineWorker, AppServicesError> {
    let worker = OfflineWorker::new(
        CacheManifest::default(),
        config.base_url.clone(),
        storage.caches,
        network,
        clock,
    );

    match worker.install().await {
        Ok(()) => {
            worker.activate().await?;
        }
        Err(err) => {
            let cached = worker.has_current_cache().await?;
            if cached {
                tracing::warn!(error = %err, "install failed, using the existing offline cache");
                worker.activate().await?;
            } else {
                tracing::warn!(error = %err, "install failed, running without offline cache");
            }
        }
    }
    Ok(worker)
}

