//! HTTP adapters from [`agent_session::LlmProvider`] to model-serving
//! backends.

pub mod ollama;
pub mod openai;

use std::sync::Arc;

use agent_session::LlmProvider;
use anyhow::Result;

use crate::config::{ProviderConfig, ProviderKind};

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Build the provider the configuration asks for.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(match config.kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config.clone())?),
        ProviderKind::Openai => Arc::new(OpenAiProvider::new(config.clone())?),
    })
}
