//! WebPilot library
//!
//! Exposes modules for integration testing

pub mod config;
pub mod llm;
pub mod page;

pub use config::{ProviderConfig, ProviderKind, WebPilotConfig};
pub use page::PageSnapshot;
