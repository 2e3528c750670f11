//! The closed set of tools the model may invoke.
//!
//! Model output carries tool calls as `{"tool": "<name>", "params": {...}}`.
//! Decoding happens here, at the boundary: unknown tool names and
//! malformed parameter shapes are rejected before any policy or
//! execution logic ever sees them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Output mode for `read_page`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Visible text only (default).
    #[default]
    Text,
    /// Full page markup.
    Html,
}

/// Viewport movement for `scroll`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Jump to the top of the page.
    Top,
    /// Jump to the bottom of the page.
    Bottom,
    /// Move up one screen.
    Up,
    /// Move down one screen (default).
    #[default]
    Down,
}

impl std::fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(name)
    }
}

/// A structured request parsed from model output, one of a fixed set.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolCall {
    /// Return the page's visible text or markup.
    ReadPage { mode: ReadMode },
    /// Click the element matching a CSS selector.
    ClickElement { selector: String },
    /// Type text into the input matching a CSS selector.
    TypeText { selector: String, text: String },
    /// Move the viewport.
    Scroll { direction: ScrollDirection },
    /// Enumerate anchor elements with visible text.
    GetLinks,
    /// Navigate the page to a search-results address for a query.
    GoogleSearch { query: String },
}

/// Failures at the tool-call decode boundary.
#[derive(Debug, Error)]
pub enum ToolCallParseError {
    /// The payload was not a JSON object at all.
    #[error("tool call is not valid JSON: {0}")]
    Json(String),

    /// The `tool` tag named something outside the fixed set.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The params did not match the tool's declared shape.
    #[error("invalid params for {tool}: {message}")]
    InvalidParams { tool: &'static str, message: String },
}

#[derive(Deserialize)]
struct RawToolCall {
    tool: String,
    #[serde(default)]
    params: Value,
}

#[derive(Deserialize)]
struct ReadPageParams {
    #[serde(default)]
    mode: ReadMode,
}

#[derive(Deserialize)]
struct SelectorParams {
    selector: String,
}

#[derive(Deserialize)]
struct TypeTextParams {
    selector: String,
    text: String,
}

#[derive(Deserialize)]
struct ScrollParams {
    #[serde(default)]
    direction: ScrollDirection,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

impl ToolCall {
    /// Decode a tool call from raw model text (one JSON object).
    pub fn from_json_str(raw: &str) -> Result<Self, ToolCallParseError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| ToolCallParseError::Json(err.to_string()))?;
        Self::from_value(value)
    }

    /// Decode a tool call from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ToolCallParseError> {
        let raw: RawToolCall = serde_json::from_value(value)
            .map_err(|err| ToolCallParseError::Json(err.to_string()))?;

        fn params<T: serde::de::DeserializeOwned>(
            tool: &'static str,
            value: Value,
        ) -> Result<T, ToolCallParseError> {
            let value = if value.is_null() {
                Value::Object(Default::default())
            } else {
                value
            };
            serde_json::from_value(value).map_err(|err| ToolCallParseError::InvalidParams {
                tool,
                message: err.to_string(),
            })
        }

        match raw.tool.as_str() {
            "read_page" => {
                let p: ReadPageParams = params("read_page", raw.params)?;
                Ok(Self::ReadPage { mode: p.mode })
            }
            "click_element" => {
                let p: SelectorParams = params("click_element", raw.params)?;
                Ok(Self::ClickElement {
                    selector: p.selector,
                })
            }
            "type_text" => {
                let p: TypeTextParams = params("type_text", raw.params)?;
                Ok(Self::TypeText {
                    selector: p.selector,
                    text: p.text,
                })
            }
            "scroll" => {
                let p: ScrollParams = params("scroll", raw.params)?;
                Ok(Self::Scroll {
                    direction: p.direction,
                })
            }
            "get_links" => Ok(Self::GetLinks),
            "google_search" => {
                let p: SearchParams = params("google_search", raw.params)?;
                Ok(Self::GoogleSearch { query: p.query })
            }
            other => Err(ToolCallParseError::UnknownTool(other.to_string())),
        }
    }

    /// Canonical wire name of the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadPage { .. } => "read_page",
            Self::ClickElement { .. } => "click_element",
            Self::TypeText { .. } => "type_text",
            Self::Scroll { .. } => "scroll",
            Self::GetLinks => "get_links",
            Self::GoogleSearch { .. } => "google_search",
        }
    }

    /// Read-only tools cannot mutate page or account state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::ReadPage { .. } | Self::GetLinks | Self::Scroll { .. }
        )
    }

    /// Write-capable tools count against the rate budget.
    pub fn is_write_capable(&self) -> bool {
        !self.is_read_only()
    }

    /// Selector targeted by this call, when it has one.
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::ClickElement { selector } | Self::TypeText { selector, .. } => Some(selector),
            _ => None,
        }
    }
}
