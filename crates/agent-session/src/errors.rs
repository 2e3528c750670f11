use thiserror::Error;

/// Errors emitted by model providers and the session.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model-serving backend failed or returned garbage.
    #[error("provider error: {0}")]
    Provider(String),

    /// The backend answered but carried no usable text.
    #[error("empty model reply")]
    EmptyReply,
}

impl AgentError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}
