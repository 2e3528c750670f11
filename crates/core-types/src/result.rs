//! Normalized outcomes: policy verdicts and tool results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decision produced once per tool invocation attempt. Never persisted
/// beyond the current turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the action may proceed.
    pub allowed: bool,

    /// Human-readable reason, present on denial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Extension point for an interactive-confirmation policy; the
    /// default policy never sets it.
    #[serde(default)]
    pub requires_confirmation: bool,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            requires_confirmation: false,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            requires_confirmation: false,
        }
    }
}

/// One shape for every tool outcome. `blocked` distinguishes a policy
/// denial from an execution-time failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub blocked: bool,
}

impl ToolResult {
    /// Successful execution carrying the tool's payload.
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            blocked: false,
        }
    }

    /// Execution fault: element not found, script error, inaccessible
    /// page. The page may or may not have been touched.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            blocked: false,
        }
    }

    /// Policy denial: the page was never touched.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(reason.into()),
            blocked: true,
        }
    }
}

/// An anchor element surfaced by `get_links`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    /// Visible anchor text, trimmed.
    pub text: String,
    /// Resolved href.
    pub url: String,
}
