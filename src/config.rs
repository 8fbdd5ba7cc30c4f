//! Runtime configuration with environment fallbacks.

use crate::credential::FileStore;
use crate::error::Result;
use crate::orchestrator::DEFAULT_PROGRESS_INTERVAL;
use crate::remote::{GeminiClient, GeminiModel};
use crate::style::StyleCatalog;
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the storage file location.
pub const STORE_ENV: &str = "STUDIOSHOT_STORE";
/// Overrides the API base URL.
pub const BASE_URL_ENV: &str = "STUDIOSHOT_BASE_URL";
/// Points at a JSON style catalog.
pub const CATALOG_ENV: &str = "STUDIOSHOT_CATALOG";
/// API key fallback when no stored key validates.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Reads the fallback API key from the environment.
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

/// Resolved settings for a session.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Storage file for the obfuscated key.
    pub store_path: PathBuf,
    /// API base URL; `None` uses the public endpoint.
    pub base_url: Option<String>,
    /// JSON style catalog; `None` uses the built-in presets.
    pub catalog_path: Option<PathBuf>,
    /// Image model.
    pub model: GeminiModel,
    /// Time between progress message changes.
    pub progress_interval: Duration,
}

impl StudioConfig {
    /// Creates a new `StudioConfigBuilder`.
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder::new()
    }

    /// Builds the Gemini client for these settings.
    pub fn client(&self) -> Result<GeminiClient> {
        let mut builder = GeminiClient::builder().model(self.model);
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        builder.build()
    }

    /// Opens the key-value store.
    pub fn storage(&self) -> FileStore {
        FileStore::new(&self.store_path)
    }

    /// Loads the style catalog.
    pub fn catalog(&self) -> Result<StyleCatalog> {
        match &self.catalog_path {
            Some(path) => StyleCatalog::load(path),
            None => Ok(StyleCatalog::builtin()),
        }
    }
}

/// Builder for StudioConfig.
#[derive(Debug, Clone, Default)]
pub struct StudioConfigBuilder {
    store_path: Option<PathBuf>,
    base_url: Option<String>,
    catalog_path: Option<PathBuf>,
    model: GeminiModel,
    progress_interval: Option<Duration>,
}

impl StudioConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage file. Falls back to `STUDIOSHOT_STORE`, then the data dir.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Sets the API base URL. Falls back to `STUDIOSHOT_BASE_URL`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the catalog file. Falls back to `STUDIOSHOT_CATALOG`.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Sets the image model.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the progress message interval.
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Resolves explicit values, then environment, then defaults.
    pub fn build(self) -> Result<StudioConfig> {
        let store_path = match self
            .store_path
            .or_else(|| std::env::var_os(STORE_ENV).map(PathBuf::from))
        {
            Some(path) => path,
            None => FileStore::default_path()?,
        };

        Ok(StudioConfig {
            store_path,
            base_url: self.base_url.or_else(|| std::env::var(BASE_URL_ENV).ok()),
            catalog_path: self
                .catalog_path
                .or_else(|| std::env::var_os(CATALOG_ENV).map(PathBuf::from)),
            model: self.model,
            progress_interval: self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
        })
    }
}
