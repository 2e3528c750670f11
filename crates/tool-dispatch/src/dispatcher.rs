//! Dispatch sequence: resolve page address, gate, execute, normalize.

use std::sync::Arc;

use policy_gate::PolicyGate;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;
use webpilot_core_types::{ToolCall, ToolResult};

use crate::errors::PageError;
use crate::ports::PagePort;

/// Hard cap on `read_page` output, protecting the model's context
/// window from unbounded page size.
pub const PAGE_TEXT_LIMIT: usize = 10_000;

/// Hard cap on `get_links` entries.
pub const MAX_LINKS: usize = 50;

/// Side channel for surfacing a policy denial to the host, invoked
/// synchronously before the dispatcher returns. Must not panic.
/// Lifetime-generic so callers can pass closures borrowing local
/// state.
pub type OnBlocked<'a> = dyn Fn(&str) + Send + Sync + 'a;

/// Stateless executor of tool calls against the active page.
///
/// Single attempt, no internal retry. Every underlying fault is caught
/// and normalized into `ToolResult`; nothing propagates to the caller.
pub struct ToolDispatcher {
    gate: Arc<PolicyGate>,
    page: Arc<dyn PagePort>,
}

impl ToolDispatcher {
    pub fn new(gate: Arc<PolicyGate>, page: Arc<dyn PagePort>) -> Self {
        Self { gate, page }
    }

    pub fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    /// Execute one tool call. Write-capable calls are gated first; a
    /// denial invokes `on_blocked(reason)` and returns without
    /// touching the page.
    pub async fn execute(&self, call: &ToolCall, on_blocked: Option<&OnBlocked<'_>>) -> ToolResult {
        let page_url = match self.page.current_url().await {
            Ok(url) => url,
            Err(err) => {
                warn!(tool = call.name(), error = %err, "could not resolve active page");
                return ToolResult::failure(format!("no active page: {err}"));
            }
        };

        let verdict = self.gate.validate(call, &page_url);
        if !verdict.allowed {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "action blocked by policy".to_string());
            info!(tool = call.name(), reason = %reason, "blocked");
            if let Some(callback) = on_blocked {
                callback(&reason);
            }
            return ToolResult::blocked(reason);
        }

        let outcome = self.run(call).await;

        // Only permitted attempts count against the rate budget,
        // whether or not execution succeeded.
        if call.is_write_capable() {
            self.gate.record_execution();
        }

        match outcome {
            Ok(value) => {
                debug!(tool = call.name(), "executed");
                ToolResult::ok(value)
            }
            Err(err) => {
                warn!(tool = call.name(), error = %err, "execution fault");
                ToolResult::failure(err.to_string())
            }
        }
    }

    async fn run(&self, call: &ToolCall) -> Result<Value, PageError> {
        match call {
            ToolCall::ReadPage { mode } => {
                let text = self.page.read_page(*mode).await?;
                Ok(json!(truncate_chars(&text, PAGE_TEXT_LIMIT)))
            }
            ToolCall::ClickElement { selector } => {
                self.page.click(selector).await?;
                Ok(json!(format!("clicked: {selector}")))
            }
            ToolCall::TypeText { selector, text } => {
                // Defense in depth: the selector blocklist can be
                // obfuscated, the resolved element type cannot.
                if self.page.field_is_password(selector).await? {
                    return Err(PageError::PasswordField {
                        selector: selector.clone(),
                    });
                }
                self.page.type_text(selector, text).await?;
                Ok(json!(format!("typed \"{text}\" into {selector}")))
            }
            ToolCall::Scroll { direction } => {
                self.page.scroll(*direction).await?;
                Ok(json!(format!("scrolled {direction}")))
            }
            ToolCall::GetLinks => {
                let links: Vec<_> = self
                    .page
                    .links()
                    .await?
                    .into_iter()
                    .filter(|link| !link.text.trim().is_empty())
                    .take(MAX_LINKS)
                    .collect();
                serde_json::to_value(links).map_err(|err| PageError::script(err.to_string()))
            }
            ToolCall::GoogleSearch { query } => {
                let target = build_search_url(query)?;
                // Navigation is fire-and-forget; the model must issue
                // a follow-up read_page once the page has loaded.
                self.page.navigate(target.as_str()).await?;
                Ok(json!(format!(
                    "Navigating to Google Search for \"{query}\". Read the page again once it has loaded."
                )))
            }
        }
    }
}

fn build_search_url(query: &str) -> Result<Url, PageError> {
    Url::parse_with_params("https://www.google.com/search", [("q", query)])
        .map_err(|err| PageError::script(format!("could not build search address: {err}")))
}

/// Truncate to a character budget, marking the cut.
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}\n...[truncated]", &text[..byte_idx]),
        None => text.to_string(),
    }
}
