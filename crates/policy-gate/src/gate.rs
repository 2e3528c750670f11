//! The gate itself: rate check, domain blocklist, selector blocklist.

use std::time::Instant;

use tracing::{debug, warn};
use url::Url;
use webpilot_core_types::{ToolCall, Verdict};

use crate::config::PolicyConfig;
use crate::rate::RateLimiter;

/// Policy engine for write-capable page actions.
///
/// `validate` is side-effect free apart from lazy pruning of the
/// execution log; recording an execution is the dispatcher's job,
/// after the action was actually permitted and dispatched.
pub struct PolicyGate {
    config: PolicyConfig,
    limiter: RateLimiter,
}

impl PolicyGate {
    pub fn new(config: PolicyConfig) -> Self {
        let limiter = RateLimiter::new(config.rate.max_executions, config.rate.window());
        Self { config, limiter }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decide whether a tool call may run against the given page.
    pub fn validate(&self, call: &ToolCall, page_url: &str) -> Verdict {
        // Read-only tools cannot mutate page or account state.
        if call.is_read_only() {
            return Verdict::allow();
        }

        if !self.limiter.check_at(Instant::now()) {
            let reason = format!(
                "Rate limit reached ({} actions per {}s). Wait a moment before retrying.",
                self.config.rate.max_executions,
                self.config.rate.window().as_secs()
            );
            warn!(tool = call.name(), "denied by rate limiter");
            return Verdict::deny(reason);
        }

        if matches!(
            call,
            ToolCall::ClickElement { .. } | ToolCall::TypeText { .. }
        ) {
            if let Some(verdict) = self.check_domain(call, page_url) {
                return verdict;
            }
        }

        if let ToolCall::TypeText { selector, .. } = call {
            if let Some(verdict) = self.check_selector(selector) {
                return verdict;
            }
        }

        // google_search only navigates; it neither reads nor submits
        // credentials. Everything else default-allows.
        debug!(tool = call.name(), "allowed");
        Verdict::allow()
    }

    /// Record one permitted write-capable execution, success or not.
    pub fn record_execution(&self) {
        self.limiter.record_at(Instant::now());
    }

    /// Executions currently counted against the rate budget.
    pub fn execution_count(&self) -> usize {
        self.limiter.len_at(Instant::now())
    }

    fn check_domain(&self, call: &ToolCall, page_url: &str) -> Option<Verdict> {
        let parsed = match Url::parse(page_url) {
            Ok(url) => url,
            Err(_) => {
                // Fail closed: an unverifiable address is treated as hostile.
                warn!(tool = call.name(), "page address could not be parsed, denying");
                return Some(Verdict::deny(
                    "Action blocked: the current page address could not be verified.",
                ));
            }
        };

        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        let full = page_url.to_lowercase();
        for fragment in &self.config.blocked_domains {
            if host.contains(fragment.as_str()) || full.contains(fragment.as_str()) {
                warn!(tool = call.name(), host = %host, fragment = %fragment, "denied by domain blocklist");
                return Some(Verdict::deny(format!(
                    "Action blocked: the site \"{host}\" is classified as sensitive ({fragment}). \
                     Automated actions are not permitted on this kind of site. \
                     Perform this step manually."
                )));
            }
        }
        None
    }

    fn check_selector(&self, selector: &str) -> Option<Verdict> {
        let lowered = selector.to_lowercase();
        for fragment in &self.config.sensitive_fields {
            if lowered.contains(fragment.as_str()) {
                warn!(selector = %selector, fragment = %fragment, "denied by sensitive-field blocklist");
                return Some(Verdict::deny(format!(
                    "Action blocked: the selector \"{selector}\" targets a sensitive field ({fragment}). \
                     Typing into password, payment or personal-data fields is not permitted."
                )));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webpilot_core_types::{ReadMode, ScrollDirection};

    fn gate() -> PolicyGate {
        PolicyGate::new(PolicyConfig::default())
    }

    fn click(selector: &str) -> ToolCall {
        ToolCall::ClickElement {
            selector: selector.into(),
        }
    }

    fn type_into(selector: &str) -> ToolCall {
        ToolCall::TypeText {
            selector: selector.into(),
            text: "hello".into(),
        }
    }

    #[test]
    fn read_only_tools_skip_every_check() {
        let gate = gate();
        // Even on a blocklisted site and with a hostile selector.
        for call in [
            ToolCall::ReadPage {
                mode: ReadMode::Text,
            },
            ToolCall::GetLinks,
            ToolCall::Scroll {
                direction: ScrollDirection::Bottom,
            },
        ] {
            let verdict = gate.validate(&call, "https://www.mybank.com/transfer");
            assert!(verdict.allowed, "{} should be allowed", call.name());
        }
    }

    #[test]
    fn write_tools_denied_on_blocklisted_domain() {
        let gate = gate();
        for address in [
            "https://www.mybank.com/home",
            "https://accounts.google.com/signin",
            "https://portal.azure.com/resources",
            "https://www.irs.gov/payments",
        ] {
            let verdict = gate.validate(&click("#continue"), address);
            assert!(!verdict.allowed, "{address} should deny");
            let reason = verdict.reason.unwrap();
            assert!(reason.contains("sensitive"), "reason names the category: {reason}");
        }
    }

    #[test]
    fn blocklist_matches_full_address_not_just_host() {
        let gate = gate();
        let verdict = gate.validate(&click("#go"), "https://example.com/admin/users");
        assert!(!verdict.allowed);
    }

    #[test]
    fn unparseable_address_fails_closed() {
        let gate = gate();
        let verdict = gate.validate(&click("#go"), "not a url at all");
        assert!(!verdict.allowed);
        assert!(verdict.reason.unwrap().contains("could not be verified"));
    }

    #[test]
    fn sensitive_selector_denied_on_any_address() {
        let gate = gate();
        for selector in [
            "input[type=\"password\"]",
            "input[name=\"cvv\"]",
            "#otp-entry",
            "input[autocomplete=\"cc-number\"]",
        ] {
            let verdict = gate.validate(&type_into(selector), "https://example.com/form");
            assert!(!verdict.allowed, "{selector} should deny");
        }
    }

    #[test]
    fn clicking_a_sensitive_selector_is_domain_gated_only() {
        // The selector blocklist applies to type_text specifically.
        let gate = gate();
        let verdict = gate.validate(&click("#password-help"), "https://example.com/faq");
        assert!(verdict.allowed);
    }

    #[test]
    fn google_search_is_allowed_but_rate_limited() {
        let config = PolicyConfig {
            rate: crate::config::RateLimitConfig {
                max_executions: 1,
                window_ms: 60_000,
            },
            ..Default::default()
        };
        let gate = PolicyGate::new(config);
        let search = ToolCall::GoogleSearch {
            query: "weather".into(),
        };
        assert!(gate.validate(&search, "https://mybank.com").allowed);
        gate.record_execution();
        let verdict = gate.validate(&search, "https://example.com");
        assert!(!verdict.allowed);
        assert!(verdict.reason.unwrap().contains("Rate limit"));
    }

    #[test]
    fn denied_rate_check_is_not_recorded() {
        let config = PolicyConfig {
            rate: crate::config::RateLimitConfig {
                max_executions: 1,
                window_ms: 60_000,
            },
            ..Default::default()
        };
        let gate = PolicyGate::new(config);
        gate.record_execution();
        for _ in 0..5 {
            assert!(!gate.validate(&click("#go"), "https://example.com").allowed);
        }
        assert_eq!(gate.execution_count(), 1);
    }
}
