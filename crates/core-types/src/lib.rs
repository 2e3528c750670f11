//! Shared vocabulary for the WebPilot agent core.
//!
//! Everything that crosses a crate boundary lives here: the closed
//! tool-call enum decoded at the JSON boundary, the normalized tool
//! result shape, policy verdicts, and conversation turns.

pub mod message;
pub mod result;
pub mod tool;

pub use message::{ChatRole, ConversationTurn};
pub use result::{PageLink, ToolResult, Verdict};
pub use tool::{ReadMode, ScrollDirection, ToolCall, ToolCallParseError};
