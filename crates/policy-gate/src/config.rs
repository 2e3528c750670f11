//! Policy configuration with builtin defaults.
//!
//! Deployments may extend the blocklists via the config file; the
//! builtin lists cover banking/finance, authentication, admin/cloud
//! consoles and government domains, plus credential and payment field
//! selectors. Fragments are matched as lowercase substrings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sliding-window rate limit for write-capable actions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum write-capable executions per window.
    pub max_executions: usize,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_executions: 15,
            window_ms: 60_000,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Full policy: two independent blocklists composed conjunctively with
/// the rate limiter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Domain fragments where automated write actions are blocked.
    pub blocked_domains: Vec<String>,
    /// Selector fragments that `type_text` must never target.
    pub sensitive_fields: Vec<String>,
    /// Rate limit applied to every write-capable tool.
    pub rate: RateLimitConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            blocked_domains: default_blocked_domains(),
            sensitive_fields: default_sensitive_fields(),
            rate: RateLimitConfig::default(),
        }
    }
}

fn default_blocked_domains() -> Vec<String> {
    [
        // Banking & finance
        "bank",
        "banking",
        "paypal",
        "stripe",
        "chase",
        "wellsfargo",
        "citi",
        "bbva",
        "santander",
        "coinbase",
        "binance",
        "revolut",
        "wise",
        // Authentication
        "login",
        "signin",
        "signup",
        "oauth",
        "auth",
        "sso",
        "accounts.google",
        "id.apple",
        "login.microsoftonline",
        // Admin & cloud consoles
        "admin",
        "dashboard",
        "console.cloud",
        "portal.azure",
        // Government
        "gov",
        "gob",
        "hacienda",
        "agenciatributaria",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_sensitive_fields() -> Vec<String> {
    [
        "password",
        "card",
        "tarjeta",
        "cvv",
        "cvc",
        "ssn",
        "social",
        "pin",
        "otp",
        "token",
        "secret",
        "cc-number",
        "cc-csc",
        "cc-exp",
        "new-password",
        "current-password",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_four_domain_categories() {
        let config = PolicyConfig::default();
        for fragment in ["bank", "oauth", "admin", "gov"] {
            assert!(
                config.blocked_domains.iter().any(|f| f == fragment),
                "missing builtin fragment {fragment}"
            );
        }
        assert_eq!(config.rate.max_executions, 15);
        assert_eq!(config.rate.window(), Duration::from_secs(60));
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: PolicyConfig =
            serde_yaml::from_str("rate:\n  max_executions: 3\n  window_ms: 1000\n").unwrap();
        assert_eq!(config.rate.max_executions, 3);
        assert!(!config.blocked_domains.is_empty());
        assert!(config.sensitive_fields.iter().any(|f| f == "password"));
    }
}
