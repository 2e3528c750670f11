//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::prompt::DEFAULT_SYSTEM_PROMPT;

/// Knobs for one agent session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum tool invocations per user-initiated turn.
    /// Default: 3
    pub max_tool_depth: u8,

    /// Conversation turns included in the window sent to the model.
    /// Default: 20
    pub history_limit: usize,

    /// Base system instruction.
    pub system_prompt: String,

    /// Free-form user preferences appended to the system instruction.
    pub custom_instructions: Option<String>,

    /// Tone hint ("concise", "formal", ...); omitted when `None`.
    pub response_style: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tool_depth: 3,
            history_limit: 20,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            custom_instructions: None,
            response_style: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the depth bound.
    pub fn max_tool_depth(mut self, depth: u8) -> Self {
        self.max_tool_depth = depth;
        self
    }

    /// Builder: set the history window.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Builder: replace the base system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}
