//! Pure decisions of the offline worker. `OfflineWorker` carries them out.

use url::Url;

use storage::repository::CachedResponse;

use crate::fetch::FetchedResponse;

use super::manifest::CacheManifest;

/// Install step: fill the versioned cache with every asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub cache: String,
    pub urls: Vec<String>,
}

/// Activate step: drop every other cache, then take control of open clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatePlan {
    pub delete: Vec<String>,
    pub claim_clients: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRoute {
    /// Straight to the network, never cached.
    Bypass,
    CacheFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction {
    RespondFromCache(CachedResponse),
    Network { store_if_cacheable: bool },
}

#[must_use]
pub fn plan_install(manifest: &CacheManifest) -> InstallPlan {
    InstallPlan {
        cache: manifest.version.clone(),
        urls: manifest.assets.clone(),
    }
}

#[must_use]
pub fn plan_activate(manifest: &CacheManifest, existing: &[String]) -> ActivatePlan {
    ActivatePlan {
        delete: existing
            .iter()
            .filter(|name| **name != manifest.version)
            .cloned()
            .collect(),
        claim_clients: true,
    }
}

/// Substring match on the full URL, so query strings do not defeat the bypass.
#[must_use]
pub fn route_request(manifest: &CacheManifest, url: &Url) -> RequestRoute {
    let url = url.as_str();
    if manifest
        .bypass_paths
        .iter()
        .any(|path| url.contains(path.as_str()))
    {
        RequestRoute::Bypass
    } else {
        RequestRoute::CacheFirst
    }
}

#[must_use]
pub fn after_cache_lookup(hit: Option<CachedResponse>) -> FetchAction {
    match hit {
        Some(cached) => FetchAction::RespondFromCache(cached),
        None => FetchAction::Network {
            store_if_cacheable: true,
        },
    }
}

/// Only status 200 same-origin responses are written back.
#[must_use]
pub fn should_store(response: &FetchedResponse) -> bool {
    response.is_cacheable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    use crate::fetch::ResponseKind;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn install_targets_current_version() {
        let plan = plan_install(&CacheManifest::default());
        assert_eq!(plan.cache, "quiz-game-v1");
        assert!(plan.urls.contains(&"./style.css".to_string()));
    }

    #[test]
    fn activate_keeps_only_current_version() {
        let existing = vec![
            "quiz-game-v0".to_string(),
            "quiz-game-v1".to_string(),
            "other".to_string(),
        ];
        let plan = plan_activate(&CacheManifest::default(), &existing);
        assert_eq!(plan.delete, vec!["quiz-game-v0", "other"]);
        assert!(plan.claim_clients);

        let plan = plan_activate(&CacheManifest::default(), &[]);
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn question_data_bypasses_cache() {
        let manifest = CacheManifest::default();
        assert_eq!(
            route_request(&manifest, &url("http://localhost:8000/data/quizzes.json")),
            RequestRoute::Bypass
        );
        assert_eq!(
            route_request(&manifest, &url("http://localhost:8000/data/quizzes.json?v=2")),
            RequestRoute::Bypass
        );
        assert_eq!(
            route_request(&manifest, &url("http://localhost:8000/style.css")),
            RequestRoute::CacheFirst
        );
    }

    #[test]
    fn cache_hit_short_circuits_network() {
        let cached = CachedResponse {
            url: "http://localhost:8000/".into(),
            status: 200,
            content_type: None,
            body: Vec::new(),
            cached_at: fixed_now(),
        };
        assert_eq!(
            after_cache_lookup(Some(cached.clone())),
            FetchAction::RespondFromCache(cached)
        );
        assert_eq!(
            after_cache_lookup(None),
            FetchAction::Network {
                store_if_cacheable: true
            }
        );
    }

    #[test]
    fn store_rule_needs_200_and_same_origin() {
        let mut response = FetchedResponse {
            url: url("http://localhost:8000/app.js"),
            status: 200,
            kind: ResponseKind::Basic,
            content_type: None,
            body: Vec::new(),
        };
        assert!(should_store(&response));
        response.status = 206;
        assert!(!should_store(&response));
        response.status = 200;
        response.kind = ResponseKind::Cors;
        assert!(!should_store(&response));
    }
}
