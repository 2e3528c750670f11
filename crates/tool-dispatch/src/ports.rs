//! Seam to the browser's page primitive.
//!
//! The host resolves "the current page" (active-tab lookup or
//! equivalent) outside this crate; the dispatcher only needs to run
//! read/mutate operations against it and observe either a value or a
//! fault.

use async_trait::async_trait;
use webpilot_core_types::{PageLink, ReadMode, ScrollDirection};

use crate::errors::PageError;

#[async_trait]
pub trait PagePort: Send + Sync {
    /// Address of the page the next action would run against.
    async fn current_url(&self) -> Result<String, PageError>;

    /// Visible text or full markup, untruncated.
    async fn read_page(&self, mode: ReadMode) -> Result<String, PageError>;

    /// Click the first element matching the selector.
    async fn click(&self, selector: &str) -> Result<(), PageError>;

    /// Whether the resolved element is a password-typed input.
    /// Checked at execution time even when the selector cleared the
    /// policy blocklist (selector obfuscation).
    async fn field_is_password(&self, selector: &str) -> Result<bool, PageError>;

    /// Set the value of the input matching the selector and dispatch
    /// input/change notifications so page-side listeners observe it.
    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError>;

    /// Move the viewport.
    async fn scroll(&self, direction: ScrollDirection) -> Result<(), PageError>;

    /// All anchor elements, unfiltered and uncapped.
    async fn links(&self) -> Result<Vec<PageLink>, PageError>;

    /// Start navigation to the address. Fire-and-forget: completion of
    /// the page load is not awaited.
    async fn navigate(&self, url: &str) -> Result<(), PageError>;
}
