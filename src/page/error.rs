//! Error types for the page module

use thiserror::Error;

/// Error type for page session and DOM query operations
#[derive(Debug, Error)]
pub enum PageError {
    /// A structural query matched nothing on the current page
    #[error("no element matches `{query}`")]
    NotFound {
        /// The query that came back empty
        query: String,
    },

    /// A CSS selector could not be parsed
    #[error("invalid selector `{query}`: {reason}")]
    InvalidSelector {
        /// The offending selector
        query: String,
        /// Parser message
        reason: String,
    },

    /// The session has not navigated anywhere yet
    #[error("no page loaded")]
    NoPage,

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response while loading a page
    #[error("{url} returned status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Browser driver error
    #[error("browser error: {0}")]
    Browser(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Blocking driver task failed to complete
    #[error("driver task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(format!("Failed to join driver task: {}", err))
    }
}

impl PageError {
    pub(crate) fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Whether the failure belongs to the page that was loaded rather than
    /// to the session itself.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::HttpStatus { .. })
    }
}
