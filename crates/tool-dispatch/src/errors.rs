use thiserror::Error;

/// Faults raised by the live-page primitive. All of them are recovered
/// locally into a `ToolResult`; none escapes the dispatcher.
#[derive(Debug, Error, Clone)]
pub enum PageError {
    /// No element matched the selector.
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// The resolved element is a password-typed input.
    #[error("password field detected at {selector}; action cancelled for safety")]
    PasswordField { selector: String },

    /// The injected page script failed.
    #[error("page script failed: {0}")]
    Script(String),

    /// The page context could not be resolved at all.
    #[error("page inaccessible: {0}")]
    Inaccessible(String),
}

impl PageError {
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }

    pub fn inaccessible(message: impl Into<String>) -> Self {
        Self::Inaccessible(message.into())
    }
}
