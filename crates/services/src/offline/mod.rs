//! Offline cache worker: precaches the app shell and answers requests cache-first.

mod manifest;
pub mod policy;
mod worker;

pub use manifest::{CACHE_VERSION, CacheManifest, DEFAULT_ASSETS, QUIZ_DATA_PATH};
pub use policy::{ActivatePlan, FetchAction, InstallPlan, RequestRoute};
pub use worker::{OfflineWorker, WorkerState};
