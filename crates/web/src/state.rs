use std::sync::Arc;

use category_storage::CategoryStore;

use crate::config::PipelineSettings;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CategoryStore>,
    pub settings: Arc<PipelineSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn CategoryStore>, settings: PipelineSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }
}
