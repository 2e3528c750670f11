//! CLI configuration: model backend, policy lists, session knobs.

use anyhow::{Context, Result};
use policy_gate::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

use agent_session::SessionConfig;

/// Which wire protocol the configured endpoint speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Ollama-native `/api/chat`.
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`.
    Openai,
}

/// Model backend connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Base address of the serving endpoint, without the API path.
    pub api_url: String,

    /// Bearer token for OpenAI-compatible endpoints. Ollama ignores it.
    pub api_key: Option<String>,

    pub model: String,

    pub temperature: f64,

    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            api_url: "http://localhost:11434".to_string(),
            api_key: None,
            model: "llama3.1".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Everything the `webpilot` binary needs, loadable from one YAML file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebPilotConfig {
    pub provider: ProviderConfig,
    pub policy: PolicyConfig,
    pub session: SessionConfig,
}

impl WebPilotConfig {
    /// Load from the given path, or the per-user default location.
    /// A missing file yields defaults; a malformed file is an error.
    pub async fn load(path: Option<&PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::config_dir().context("could not resolve config directory")?;
                path.push("webpilot");
                path.push("config.yaml");
                path
            }
        };

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            let config: Self = serde_yaml::from_str(&content)
                .with_context(|| format!("could not parse {}", path.display()))?;
            info!("loaded configuration from {}", path.display());
            config
        } else {
            warn!("config file not found, using defaults: {}", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment wins over file contents for connection settings.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WEBPILOT_API_URL") {
            self.provider.api_url = url;
        }
        if let Ok(key) = std::env::var("WEBPILOT_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("WEBPILOT_MODEL") {
            self.provider.model = model;
        }
        if let Ok(kind) = std::env::var("WEBPILOT_PROVIDER") {
            match kind.to_lowercase().as_str() {
                "ollama" => self.provider.kind = ProviderKind::Ollama,
                "openai" => self.provider.kind = ProviderKind::Openai,
                other => warn!("unknown WEBPILOT_PROVIDER value ignored: {other}"),
            }
        }
    }
}
