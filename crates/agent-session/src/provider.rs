//! Abstraction over model-serving backends.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use webpilot_core_types::ConversationTurn;

use crate::errors::AgentError;

/// One round-trip worth of context for the model.
#[derive(Clone, Debug)]
pub struct ChatRequest {
    /// System instruction followed by the bounded history window.
    pub messages: Vec<ConversationTurn>,
}

/// Seam to a model-serving backend. Payload shape differences between
/// backends (Ollama-compatible, OpenAI-compatible) are the adapter's
/// responsibility; the session only needs text back.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<String, AgentError>;
}

/// Deterministic provider used for tests and offline development:
/// replays a scripted sequence of replies and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// Number of model round-trips performed.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, AgentError> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| AgentError::provider("script exhausted"))
    }
}

/// Provider whose reply never arrives; exercises cancellation paths.
pub struct PendingProvider;

#[async_trait]
impl LlmProvider for PendingProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<String, AgentError> {
        std::future::pending().await
    }
}
