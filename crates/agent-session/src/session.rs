//! The conversation turn state machine.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tool_dispatch::ToolDispatcher;
use tracing::{debug, info, warn};
use webpilot_core_types::{ChatRole, ConversationTurn, ToolCall};

use crate::config::SessionConfig;
use crate::prompt::{build_system_instruction, tool_result_message};
use crate::provider::{ChatRequest, LlmProvider};
use crate::scanner::extract_tool_json;

/// Terminal state of one user-initiated turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final reply, after `tool_depth` tool runs.
    Answered { text: String, tool_depth: u8 },
    /// A tool call was denied by policy; the turn stops immediately.
    Blocked { reason: String },
    /// The model backend failed.
    Failed { reason: String },
    /// The host cancelled the turn while a model call was in flight.
    Cancelled,
}

/// Severity of a side-channel notice raised during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Security,
    Error,
}

/// Out-of-band event the host may surface alongside the reply.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    fn security(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Security,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Everything one call to [`AgentSession::run_turn`] produced.
#[derive(Clone, Debug)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub notices: Vec<Notice>,
}

/// One conversation with one model backend and one active page.
///
/// Holds the full history; each model request carries only the bounded
/// tail window. Tool depth resets on every fresh user turn.
pub struct AgentSession {
    config: SessionConfig,
    provider: Arc<dyn LlmProvider>,
    dispatcher: Arc<ToolDispatcher>,
    history: Vec<ConversationTurn>,
    tool_depth: u8,
    cancel: CancellationToken,
}

impl AgentSession {
    pub fn new(
        config: SessionConfig,
        provider: Arc<dyn LlmProvider>,
        dispatcher: Arc<ToolDispatcher>,
    ) -> Self {
        Self {
            config,
            provider,
            dispatcher,
            history: Vec::new(),
            tool_depth: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Full conversation so far, oldest first.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Tool executions performed during the most recent turn.
    pub fn tool_depth(&self) -> u8 {
        self.tool_depth
    }

    /// Install a fresh cancellation token for the upcoming turn and
    /// hand it to the host. A spent token cannot be reset, so each
    /// turn gets its own.
    pub fn arm_cancellation(&mut self) -> CancellationToken {
        self.cancel = CancellationToken::new();
        self.cancel.clone()
    }

    /// Drop all accumulated history.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.tool_depth = 0;
    }

    /// Drive one user message to a terminal state. Tool calls run
    /// strictly one at a time; cancellation is observed while a model
    /// call is suspended.
    pub async fn run_turn(&mut self, user_text: impl Into<String>) -> TurnReport {
        self.tool_depth = 0;
        self.history.push(ConversationTurn::user(user_text));

        let mut notices = Vec::new();
        let mut is_follow_up = false;

        loop {
            let can_use_tool = self.tool_depth < self.config.max_tool_depth;
            let request = self.build_request(can_use_tool, is_follow_up);

            let reply = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("turn cancelled while awaiting the model");
                    return TurnReport {
                        outcome: TurnOutcome::Cancelled,
                        notices,
                    };
                }
                reply = self.provider.chat(request) => reply,
            };

            let reply = match reply {
                Ok(text) if text.trim().is_empty() => {
                    warn!("model returned an empty reply");
                    return TurnReport {
                        outcome: TurnOutcome::Failed {
                            reason: "empty model reply".to_string(),
                        },
                        notices,
                    };
                }
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "model call failed");
                    return TurnReport {
                        outcome: TurnOutcome::Failed {
                            reason: err.to_string(),
                        },
                        notices,
                    };
                }
            };

            self.history.push(ConversationTurn::assistant(reply.clone()));

            // Depth exhausted: the reply stands as-is, even if it
            // still embeds a tool call.
            if self.tool_depth >= self.config.max_tool_depth {
                debug!(depth = self.tool_depth, "tool depth exhausted");
                return self.answered(reply, notices);
            }

            let Some(tool_json) = extract_tool_json(&reply) else {
                return self.answered(reply, notices);
            };

            let call = match ToolCall::from_json_str(tool_json) {
                Ok(call) => call,
                Err(err) => {
                    warn!(error = %err, "malformed tool call in model reply");
                    notices.push(Notice::error(format!("tool call rejected: {err}")));
                    return self.answered(reply, notices);
                }
            };

            self.tool_depth += 1;
            info!(tool = call.name(), depth = self.tool_depth, "dispatching tool");

            let denial: Mutex<Option<String>> = Mutex::new(None);
            let result = self
                .dispatcher
                .execute(&call, Some(&|reason| {
                    *denial.lock() = Some(reason.to_string());
                }))
                .await;

            if result.blocked {
                let reason = denial
                    .into_inner()
                    .or(result.error)
                    .unwrap_or_else(|| "action blocked by policy".to_string());
                notices.push(Notice::security(reason.clone()));
                self.history.push(ConversationTurn::system(format!(
                    "[SECURITY] Action blocked: {reason}"
                )));
                return TurnReport {
                    outcome: TurnOutcome::Blocked { reason },
                    notices,
                };
            }

            notices.push(Notice::info(format!("executed {}", call.name())));
            self.history.push(ConversationTurn::user(tool_result_message(
                call.name(),
                &result,
            )));
            is_follow_up = true;
        }
    }

    fn answered(&self, text: String, notices: Vec<Notice>) -> TurnReport {
        TurnReport {
            outcome: TurnOutcome::Answered {
                text,
                tool_depth: self.tool_depth,
            },
            notices,
        }
    }

    /// System instruction plus the last `history_limit` turns.
    fn build_request(&self, can_use_tool: bool, is_follow_up: bool) -> ChatRequest {
        let instruction = build_system_instruction(&self.config, can_use_tool, is_follow_up);

        let window_start = self.history.len().saturating_sub(self.config.history_limit);
        let mut messages = Vec::with_capacity(self.history.len() - window_start + 1);
        messages.push(ConversationTurn {
            role: ChatRole::System,
            content: instruction,
        });
        messages.extend_from_slice(&self.history[window_start..]);

        ChatRequest { messages }
    }
}
