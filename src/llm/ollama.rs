//! Ollama-native chat adapter (`POST {base}/api/chat`).

use agent_session::{AgentError, ChatRequest, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use webpilot_core_types::ConversationTurn;

use crate::config::ProviderConfig;

pub struct OllamaProvider {
    client: Client,
    config: ProviderConfig,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, AgentError> {
        let body = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: request.messages,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(model = %body.model, messages = body.messages.len(), "ollama chat request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|err| AgentError::provider(format!("ollama request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(AgentError::provider(format!(
                "ollama returned {status}: {text}"
            )));
        }

        let response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|err| AgentError::provider(format!("ollama response invalid: {err}")))?;

        if response.message.content.trim().is_empty() {
            return Err(AgentError::EmptyReply);
        }
        Ok(response.message.content)
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ConversationTurn>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = ProviderConfig {
            kind: ProviderKind::Ollama,
            api_url: "http://localhost:11434/".to_string(),
            ..Default::default()
        };
        let provider = OllamaProvider::new(config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn request_serializes_roles_lowercase() {
        let body = OllamaChatRequest {
            model: "llama3.1".into(),
            messages: vec![ConversationTurn::user("hi")],
            stream: false,
            options: OllamaOptions { temperature: 0.7 },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["temperature"], 0.7);
    }
}
