use std::sync::Arc;

use crate::config::{Config, ValidationError};
use crate::mention::{MentionIndexer, SiteRoutes};
use crate::observability::Metrics;
use crate::store::BlogStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: BlogStore,
    pub indexer: Arc<MentionIndexer<SiteRoutes>>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, store: BlogStore) -> Result<Self, ValidationError> {
        let routes = config.site_routes()?;
        Ok(Self {
            config: Arc::new(config),
            indexer: Arc::new(MentionIndexer::new(store.clone(), routes)),
            store,
            metrics: Arc::new(Metrics::new()),
        })
    }
}
