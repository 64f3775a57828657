use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::db::BlobStore;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::repository::ScheduleStore;
use crate::services::layout::LayoutWindow;
use crate::services::validator::ValidationRules;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ScheduleStore>>,
    pub ids: Arc<dyn IdGenerator>,
    pub rules: ValidationRules,
    pub window: LayoutWindow,
}

impl AppState {
    /// Loads the store from `blob`; rules and window come from `config`.
    pub async fn new(blob: Arc<dyn BlobStore>, config: &AppConfig) -> Self {
        Self::with_ids(blob, Arc::new(UuidGenerator), config).await
    }

    pub async fn with_ids(
        blob: Arc<dyn BlobStore>,
        ids: Arc<dyn IdGenerator>,
        config: &AppConfig,
    ) -> Self {
        let store = ScheduleStore::open(blob).await;
        Self {
            store: Arc::new(Mutex::new(store)),
            ids,
            rules: config.rules.clone(),
            window: config.window,
        }
    }
}
