use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use url::Url;

use quiz_core::Clock;
use storage::repository::{CacheStore, CachedResponse};

use crate::error::{TransportError, WorkerError};
use crate::fetch::{FetchedResponse, Fetcher, ResourceRequest};

use super::manifest::CacheManifest;
use super::policy::{self, ActivatePlan, FetchAction, RequestRoute};

/// Lifecycle of the worker; only an activated worker intercepts requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installed,
    Activated,
}

/// Cache-first proxy in front of a network `Fetcher`.
pub struct OfflineWorker {
    manifest: CacheManifest,
    scope: Url,
    caches: Arc<dyn CacheStore>,
    network: Arc<dyn Fetcher>,
    clock: Clock,
    state: RwLock<WorkerState>,
}

impl OfflineWorker {
    #[must_use]
    pub fn new(
        manifest: CacheManifest,
        scope: Url,
        caches: Arc<dyn CacheStore>,
        network: Arc<dyn Fetcher>,
        clock: Clock,
    ) -> Self {
        Self {
            manifest,
            scope,
            caches,
            network,
            clock,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_controlling(&self) -> bool {
        self.state() == WorkerState::Activated
    }

    fn set_state(&self, next: WorkerState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Precache every manifest asset into the versioned cache.
    ///
    /// All assets are fetched before anything is written, so a failed install
    /// leaves the store as it was.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError` if any asset cannot be fetched, answers with a
    /// non-2xx status, or the cache write fails.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let plan = policy::plan_install(&self.manifest);
        tracing::info!(cache = %plan.cache, assets = plan.urls.len(), "installing offline cache");

        let mut entries = Vec::with_capacity(plan.urls.len());
        for path in &plan.urls {
            let url = self
                .scope
                .join(path)
                .map_err(|source| WorkerError::InvalidAsset {
                    path: path.clone(),
                    source,
                })?;
            let request = ResourceRequest::new(url);
            let response =
                self.network
                    .fetch(&request)
                    .await
                    .map_err(|source| WorkerError::Install {
                        url: request.url().to_string(),
                        source,
                    })?;
            if !response.is_ok() {
                return Err(WorkerError::InstallStatus {
                    url: request.url().to_string(),
                    status: response.status,
                });
            }
            entries.push(self.entry_for(&request, &response));
        }

        self.caches.put_all(&plan.cache, entries).await?;
        self.set_state(WorkerState::Installed);
        tracing::info!(cache = %plan.cache, "offline cache installed");
        Ok(())
    }

    /// Delete stale caches and start intercepting requests.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::Storage` if the caches cannot be listed or deleted.
    pub async fn activate(&self) -> Result<ActivatePlan, WorkerError> {
        let existing = self.caches.cache_names().await?;
        let plan = policy::plan_activate(&self.manifest, &existing);
        for name in &plan.delete {
            tracing::info!(cache = %name, "deleting stale cache");
            self.caches.delete_cache(name).await?;
        }
        if plan.claim_clients {
            self.set_state(WorkerState::Activated);
        }
        tracing::info!(cache = %self.manifest.version, "offline worker activated");
        Ok(plan)
    }

    /// Whether the current version's cache exists from an earlier install.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::Storage` if the caches cannot be listed.
    pub async fn has_current_cache(&self) -> Result<bool, WorkerError> {
        let names = self.caches.cache_names().await?;
        Ok(names.iter().any(|name| *name == self.manifest.version))
    }

    /// Answer a request: bypass, cache hit, or network with write-back.
    ///
    /// Cache read and write failures degrade to a miss; only a network
    /// failure without a cached copy is an error.
    ///
    /// # Errors
    ///
    /// Returns the network `TransportError` when nothing could be served.
    pub async fn handle_fetch(
        &self,
        request: &ResourceRequest,
    ) -> Result<FetchedResponse, TransportError> {
        if !self.is_controlling() {
            return self.network.fetch(request).await;
        }

        let url = request.url();
        if policy::route_request(&self.manifest, url) == RequestRoute::Bypass {
            tracing::debug!(%url, "bypassing cache");
            return self.network.fetch(request).await;
        }

        let hit = match self.caches.match_request(url.as_str()).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!(%url, error = %err, "cache lookup failed");
                None
            }
        };

        match policy::after_cache_lookup(hit) {
            FetchAction::RespondFromCache(cached) => {
                tracing::debug!(%url, "serving from cache");
                FetchedResponse::from_cached(cached)
            }
            FetchAction::Network { store_if_cacheable } => {
                tracing::debug!(%url, "fetching from network");
                let response = self.network.fetch(request).await.inspect_err(|err| {
                    tracing::info!(%url, error = %err, "offline and not cached");
                })?;
                if store_if_cacheable && policy::should_store(&response) {
                    let entry = self.entry_for(request, &response);
                    if let Err(err) = self.caches.put(&self.manifest.version, entry).await {
                        tracing::warn!(%url, error = %err, "cache write failed");
                    }
                }
                Ok(response)
            }
        }
    }

    fn entry_for(&self, request: &ResourceRequest, response: &FetchedResponse) -> CachedResponse {
        let mut entry = response.to_cached(self.clock.now());
        entry.url = request.url().to_string();
        entry
    }
}

#[async_trait]
impl Fetcher for OfflineWorker {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, TransportError> {
        self.handle_fetch(request).await
    }
}

impl fmt::Debug for OfflineWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("manifest", &self.manifest)
            .field("scope", &self.scope.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
