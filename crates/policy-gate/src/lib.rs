//! Security gate in front of every write-capable page action.
//!
//! The gate is a pure decision function over (tool, params, current
//! page address) plus one piece of owned mutable state: the sliding
//! window of recent execution timestamps used for rate limiting. It
//! performs no I/O and never panics on adversarial input.

pub mod config;
pub mod gate;
pub mod rate;

pub use config::{PolicyConfig, RateLimitConfig};
pub use gate::PolicyGate;
pub use rate::RateLimiter;
