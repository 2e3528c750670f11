//! OpenAI-compatible chat adapter (`POST {base}/v1/chat/completions`).
//!
//! Works against OpenAI itself and against compatible servers
//! (LM Studio, vLLM, llama.cpp). `content` may come back as a plain
//! string or as a parts array, both are accepted.

use agent_session::{AgentError, ChatRequest, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use webpilot_core_types::ConversationTurn;

use crate::config::ProviderConfig;

pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, AgentError> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            messages: request.messages,
        };

        debug!(model = %body.model, messages = body.messages.len(), "openai chat request");

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| AgentError::provider(format!("openai request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(AgentError::provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AgentError::provider(format!("openai response invalid: {err}")))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_text())
            .filter(|text| !text.trim().is_empty())
            .ok_or(AgentError::EmptyReply)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f64,
    messages: Vec<ConversationTurn>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: ChatCompletionContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatCompletionContent {
    Text(String),
    Parts(Vec<ChatCompletionPart>),
}

impl ChatCompletionContent {
    fn as_text(&self) -> Option<String> {
        match self {
            ChatCompletionContent::Text(value) => Some(value.clone()),
            ChatCompletionContent::Parts(parts) => {
                let text = parts
                    .iter()
                    .filter_map(|part| part.text.as_ref())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n");
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionPart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_parts_content_both_decode() {
        let plain: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            plain.choices[0].message.content.as_text().as_deref(),
            Some("hello")
        );

        let parts: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": [{"text": "a"}, {"text": "b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            parts.choices[0].message.content.as_text().as_deref(),
            Some("a\nb")
        );
    }

    #[test]
    fn endpoint_is_the_completions_path() {
        let provider = OpenAiProvider::new(ProviderConfig::default()).unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
