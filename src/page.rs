//! Page snapshots for running the copilot without a live browser.
//!
//! A snapshot file (YAML or JSON) captures the page as the agent sees
//! it: address, extracted text, raw HTML, links and the selectors that
//! resolve to password inputs. The `chat` command serves it through
//! the same port a live adapter would implement.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tool_dispatch::testing::StaticPage;
use webpilot_core_types::PageLink;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    pub url: String,
    pub text: String,
    pub html: String,
    pub links: Vec<PageLink>,
    /// Selectors that resolve to password-typed inputs.
    pub password_fields: Vec<String>,
}

impl PageSnapshot {
    /// YAML unless the extension says `.json`.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        let snapshot = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("could not parse {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("could not parse {}", path.display()))?
        };
        Ok(snapshot)
    }

    pub fn into_page(self) -> StaticPage {
        let mut page = StaticPage::new(self.url)
            .with_text(self.text)
            .with_html(self.html);
        for link in self.links {
            page = page.with_link(link.text, link.url);
        }
        for selector in self.password_fields {
            page = page.with_password_field(selector);
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tool_dispatch::PagePort;
    use webpilot_core_types::ReadMode;

    #[tokio::test]
    async fn yaml_snapshot_round_trips_through_the_port() {
        let yaml = r##"
url: "https://example.com/docs"
text: "Documentation index"
links:
  - text: "Guide"
    url: "https://example.com/guide"
password_fields:
  - "#login-pass"
"##;
        let snapshot: PageSnapshot = serde_yaml::from_str(yaml).unwrap();
        let page = snapshot.into_page();

        assert_eq!(page.current_url().await.unwrap(), "https://example.com/docs");
        assert_eq!(
            page.read_page(ReadMode::Text).await.unwrap(),
            "Documentation index"
        );
        assert_eq!(page.links().await.unwrap().len(), 1);
        assert!(page.field_is_password("#login-pass").await.unwrap());
    }
}
