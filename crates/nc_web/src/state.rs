use std::collections::HashMap;
use std::sync::Arc;
use nc_core::SummaryResult;
use nc_inference::Summarizer;
use nc_news::Feed;
use tokio::sync::RwLock;

pub struct AppState {
    pub summarizer: Arc<Summarizer>,
    pub feed: Feed,
    /// Summaries computed so far, keyed by article id.
    pub summaries: RwLock<HashMap<String, SummaryResult>>,
}

impl AppState {
    pub fn new(summarizer: Arc<Summarizer>, feed: Feed) -> Self {
        Self {
            summarizer,
            feed,
            summaries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn cached_summary(&self, id: &str) -> Option<SummaryResult> {
        self.summaries.read().await.get(id).cloned()
    }
}
