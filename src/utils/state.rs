use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::catalog::ToolCatalog;
use crate::core::categories::CategoryTable;
use crate::core::chat_proxy::ChatProxy;
use crate::core::popularity::{PopularitySource, RandomPopularity};
use crate::utils::config::Config;

/// Everything a handler needs, built once at startup. Nothing in here is
/// mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<ToolCatalog>,
    pub categories: Arc<CategoryTable>,
    pub popularity: Arc<dyn PopularitySource>,
    pub chat: Arc<ChatProxy>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_popularity(config, Arc::new(RandomPopularity))
    }

    pub fn with_popularity(config: &Config, popularity: Arc<dyn PopularitySource>) -> Result<Self> {
        let chat = ChatProxy::new(&config.nlp_service_url, config.nlp_timeout)
            .context("Failed to set up chat proxy")?;

        Ok(AppState {
            config: Arc::new(config.clone()),
            catalog: Arc::new(ToolCatalog::new(&config.catalog_path, config.catalog_cache)),
            categories: Arc::new(CategoryTable::builtin()),
            popularity,
            chat: Arc::new(chat),
        })
    }
}
