/// Cache name for the current app version. Bumping it evicts older caches on activate.
pub const CACHE_VERSION: &str = "quiz-game-v1";

/// Question data is never cached so that a replaced file is always picked up.
pub const QUIZ_DATA_PATH: &str = "data/quizzes.json";

/// App shell assets, relative to the app base URL.
pub const DEFAULT_ASSETS: [&str; 7] = [
    "./",
    "./index.html",
    "./style.css",
    "./app.js",
    "./manifest.json",
    "./quiz_icon_192.png",
    "./quiz_icon_512.png",
];

/// What the worker precaches and what it must leave to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    pub version: String,
    pub assets: Vec<String>,
    pub bypass_paths: Vec<String>,
}

impl CacheManifest {
    #[must_use]
    pub fn new(version: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            version: version.into(),
            assets,
            bypass_paths: vec![QUIZ_DATA_PATH.to_string()],
        }
    }

    #[must_use]
    pub fn with_bypass(mut self, path: impl Into<String>) -> Self {
        self.bypass_paths.push(path.into());
        self
    }
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::new(
            CACHE_VERSION,
            DEFAULT_ASSETS.iter().map(|asset| (*asset).to_string()).collect(),
        )
    }
}
