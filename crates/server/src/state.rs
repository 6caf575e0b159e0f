use semsort_common::{AppConfig, Result};
use semsort_embed::{build_embedder, Embedder};
use semsort_store::{build_store, EntryStore};
use std::sync::Arc;

use crate::render::PageRenderer;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Entry persistence
    pub store: Arc<dyn EntryStore>,

    /// Embedding backend
    pub embedder: Arc<dyn Embedder>,

    /// HTML page template
    pub renderer: PageRenderer,
}

impl AppState {
    /// Create state with the collaborators selected by `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = build_store(&config)?;
        let embedder = build_embedder(&config)?;

        Self::with_parts(config, store, embedder)
    }

    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn EntryStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            store,
            embedder,
            renderer: PageRenderer::new()?,
        })
    }
}
