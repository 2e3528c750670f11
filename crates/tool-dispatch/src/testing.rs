//! Deterministic in-memory page for tests and offline development.

use async_trait::async_trait;
use parking_lot::Mutex;
use webpilot_core_types::{PageLink, ReadMode, ScrollDirection};

use crate::errors::PageError;
use crate::ports::PagePort;

/// Action observed by a [`StaticPage`].
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Clicked(String),
    Typed { selector: String, text: String },
    Scrolled(ScrollDirection),
    Navigated(String),
}

/// Canned page content behind the [`PagePort`] seam. Mutating actions
/// are recorded instead of touching a real browser.
pub struct StaticPage {
    url: Mutex<String>,
    text: String,
    html: String,
    links: Vec<PageLink>,
    password_selectors: Vec<String>,
    missing_selectors: Vec<String>,
    events: Mutex<Vec<PageEvent>>,
}

impl StaticPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Mutex::new(url.into()),
            text: String::new(),
            html: String::new(),
            links: Vec::new(),
            password_selectors: Vec::new(),
            missing_selectors: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_link(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.push(PageLink {
            text: text.into(),
            url: url.into(),
        });
        self
    }

    /// Mark a selector as resolving to a password-typed input.
    pub fn with_password_field(mut self, selector: impl Into<String>) -> Self {
        self.password_selectors.push(selector.into());
        self
    }

    /// Mark a selector as matching nothing on the page.
    pub fn with_missing(mut self, selector: impl Into<String>) -> Self {
        self.missing_selectors.push(selector.into());
        self
    }

    /// Actions taken so far, in order.
    pub fn events(&self) -> Vec<PageEvent> {
        self.events.lock().clone()
    }

    fn resolve(&self, selector: &str) -> Result<(), PageError> {
        if self.missing_selectors.iter().any(|s| s == selector) {
            return Err(PageError::element_not_found(selector));
        }
        Ok(())
    }
}

#[async_trait]
impl PagePort for StaticPage {
    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.url.lock().clone())
    }

    async fn read_page(&self, mode: ReadMode) -> Result<String, PageError> {
        Ok(match mode {
            ReadMode::Text => self.text.clone(),
            ReadMode::Html => self.html.clone(),
        })
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.resolve(selector)?;
        self.events
            .lock()
            .push(PageEvent::Clicked(selector.to_string()));
        Ok(())
    }

    async fn field_is_password(&self, selector: &str) -> Result<bool, PageError> {
        self.resolve(selector)?;
        Ok(self.password_selectors.iter().any(|s| s == selector))
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError> {
        self.resolve(selector)?;
        self.events.lock().push(PageEvent::Typed {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn scroll(&self, direction: ScrollDirection) -> Result<(), PageError> {
        self.events.lock().push(PageEvent::Scrolled(direction));
        Ok(())
    }

    async fn links(&self) -> Result<Vec<PageLink>, PageError> {
        Ok(self.links.clone())
    }

    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        *self.url.lock() = url.to_string();
        self.events
            .lock()
            .push(PageEvent::Navigated(url.to_string()));
        Ok(())
    }
}

/// Page whose context cannot be resolved at all.
pub struct UnreachablePage;

#[async_trait]
impl PagePort for UnreachablePage {
    async fn current_url(&self) -> Result<String, PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn read_page(&self, _mode: ReadMode) -> Result<String, PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn click(&self, _selector: &str) -> Result<(), PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn field_is_password(&self, _selector: &str) -> Result<bool, PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn type_text(&self, _selector: &str, _text: &str) -> Result<(), PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn scroll(&self, _direction: ScrollDirection) -> Result<(), PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn links(&self) -> Result<Vec<PageLink>, PageError> {
        Err(PageError::inaccessible("no active tab"))
    }

    async fn navigate(&self, _url: &str) -> Result<(), PageError> {
        Err(PageError::inaccessible("no active tab"))
    }
}
