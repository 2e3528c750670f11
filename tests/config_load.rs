//! Configuration loading against real files.

use std::io::Write;

use webpilot_cli::{ProviderKind, WebPilotConfig};

#[tokio::test]
async fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("webpilot-no-such-config.yaml");
    let config = WebPilotConfig::load(Some(&path)).await.unwrap();
    assert_eq!(config.provider.kind, ProviderKind::Ollama);
    assert_eq!(config.session.max_tool_depth, 3);
}

#[tokio::test]
async fn yaml_file_is_loaded_and_merged_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        "provider:\n  kind: openai\n  api_url: \"https://llm.internal\"\npolicy:\n  rate:\n    max_executions: 5\n    window_ms: 30000\n"
    )
    .unwrap();

    let config = WebPilotConfig::load(Some(&path)).await.unwrap();
    assert_eq!(config.provider.kind, ProviderKind::Openai);
    assert_eq!(config.provider.api_url, "https://llm.internal");
    assert_eq!(config.policy.rate.max_executions, 5);
    // Untouched sections keep their builtin values.
    assert!(config.policy.blocked_domains.iter().any(|f| f == "bank"));
    assert_eq!(config.session.history_limit, 20);
}

#[tokio::test]
async fn malformed_yaml_is_an_error_not_a_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "provider: [this is not a mapping").unwrap();

    assert!(WebPilotConfig::load(Some(&path)).await.is_err());
}
