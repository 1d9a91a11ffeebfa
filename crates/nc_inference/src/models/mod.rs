use std::sync::Arc;
use nc_core::{ChatModel, Result};
use tracing::{info, warn};

use crate::{InferenceConfig, ModelKind};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiCompatModel;

/// Builds the backend selected by `config.model_kind`.
pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn ChatModel>> {
    match config.model_kind {
        ModelKind::OpenAi => {
            let config = config.clone().validated()?;
            if config.api_key.is_none() {
                warn!("⚠️ HF_TOKEN is not set, requests to {} will likely be rejected", config.base_url);
            }
            info!("🧠 Using OpenAI-compatible endpoint at {}", config.base_url);
            Ok(Arc::new(OpenAiCompatModel::new(&config)?))
        }
        ModelKind::Dummy => {
            info!("🧪 Using offline dummy model");
            Ok(Arc::new(DummyModel::new()))
        }
    }
}
