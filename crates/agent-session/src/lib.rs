//! Agent orchestrator: owns the conversation turn.
//!
//! Sends the user's (or a tool's) message to the model, scans the
//! reply for an embedded tool invocation, dispatches it when depth and
//! policy allow, folds the result back as a synthetic turn, and
//! finalizes the assistant reply. Recursion is an explicit awaited
//! loop, so depth counting and cancellation are structural.

pub mod config;
pub mod errors;
pub mod prompt;
pub mod provider;
pub mod scanner;
pub mod session;

pub use config::SessionConfig;
pub use errors::AgentError;
pub use provider::{ChatRequest, LlmProvider, PendingProvider, ScriptedProvider};
pub use session::{AgentSession, Notice, NoticeKind, TurnOutcome, TurnReport};
