//! Map script loader.
//!
//! One loader per process, handed to whoever needs it through the
//! application state. Its lifecycle is `NotLoaded → Loading → Ready | Failed`;
//! concurrent callers share a single load attempt and a failure sticks until
//! [`MapsLoader::reset`].

use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Default Google Maps JavaScript API endpoint
pub const DEFAULT_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// Env var consulted when the config carries no key
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("Google Maps API key is missing")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Map script returned status {0}")]
    BadStatus(u16),

    #[error("Map script failed to load earlier: {0}")]
    PreviouslyFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LoadState {
    NotLoaded,
    Loading,
    Ready,
    Failed { message: String },
}

/// Something that can fetch the map script
pub trait ScriptSource: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<(), MapsError>> + Send;

    /// Public URL of the script, if known
    fn script_url(&self) -> Option<String> {
        None
    }
}

/// Fetches the Google Maps script over HTTP
pub struct HttpScriptSource {
    client: Client,
    script_url: String,
    api_key: Option<String>,
}

impl HttpScriptSource {
    pub fn new(
        script_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MapsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            script_url: script_url.into(),
            api_key,
        })
    }

    fn url_with_key(&self, key: &str) -> String {
        format!("{}?key={}", self.script_url, urlencoding::encode(key))
    }
}

impl ScriptSource for HttpScriptSource {
    async fn load(&self) -> Result<(), MapsError> {
        let key = self.api_key.as_deref().ok_or(MapsError::MissingApiKey)?;

        let response = self.client.get(self.url_with_key(key)).send().await?;
        if !response.status().is_success() {
            return Err(MapsError::BadStatus(response.status().as_u16()));
        }

        Ok(())
    }

    fn script_url(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| self.url_with_key(key))
    }
}

/// Resolve the API key: configured value first, then [`API_KEY_ENV`]. Blank counts as missing.
pub fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .or_else(|| {
            std::env::var(API_KEY_ENV)
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        })
}

pub struct MapsLoader<S> {
    source: S,
    state: RwLock<LoadState>,
    load_lock: Mutex<()>,
}

impl<S: ScriptSource> MapsLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(LoadState::NotLoaded),
            load_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.clone()
    }

    pub fn script_url(&self) -> Option<String> {
        self.source.script_url()
    }

    /// Load the script unless already loaded or failed
    pub async fn ensure_loaded(&self) -> Result<(), MapsError> {
        let _guard = self.load_lock.lock().await;

        match self.state().await {
            LoadState::Ready => return Ok(()),
            LoadState::Failed { message } => return Err(MapsError::PreviouslyFailed(message)),
            LoadState::NotLoaded | LoadState::Loading => {}
        }

        *self.state.write().await = LoadState::Loading;
        tracing::info!("Loading map script");

        let result = self.source.load().await;
        let next = match &result {
            Ok(()) => {
                tracing::info!("Map script ready");
                LoadState::Ready
            }
            Err(e) => {
                tracing::warn!("Map script failed to load: {}", e);
                LoadState::Failed {
                    message: e.to_string(),
                }
            }
        };
        *self.state.write().await = next;

        result
    }

    /// Forget the previous outcome so the next call loads again
    pub async fn reset(&self) {
        let _guard = self.load_lock.lock().await;
        *self.state.write().await = LoadState::NotLoaded;
    }
}
