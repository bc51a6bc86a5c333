//! Error types for the plotscrape crate

use thiserror::Error;

use crate::extract::ExtractError;
use crate::page::PageError;
use crate::transform::TransformError;

/// Result type for plotscrape operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for plotscrape operations
#[derive(Debug, Error)]
pub enum Error {
    /// Page session or DOM query error
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    /// Field extraction error on a plot page
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Value coercion error
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Crawl structure error (authority, scheme or pagination layout)
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Report file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is confined to a single plot page.
    ///
    /// Crawl-level, output and session errors (a dead browser, a failed
    /// driver task, a broken connection) are never plot-local.
    pub fn is_plot_local(&self) -> bool {
        match self {
            Error::Extract(ExtractError::Page(e)) | Error::Page(e) => e.is_page_local(),
            Error::Extract(_) | Error::Transform(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_local_errors() {
        let err: Error = PageError::NotFound {
            query: "table".to_string(),
        }
        .into();
        assert!(err.is_plot_local());

        let err = Error::Crawl("authority row missing".to_string());
        assert!(!err.is_plot_local());

        let err: Error = std::io::Error::other("disk full").into();
        assert!(!err.is_plot_local());
    }

    #[test]
    fn test_session_failures_are_not_plot_local() {
        let err: Error = PageError::Browser("connection closed".to_string()).into();
        assert!(!err.is_plot_local());

        let err: Error = PageError::NoPage.into();
        assert!(!err.is_plot_local());

        let err: Error = PageError::Task("driver task panicked".to_string()).into();
        assert!(!err.is_plot_local());

        let err: Error = ExtractError::from(PageError::Browser("tab crashed".to_string())).into();
        assert!(!err.is_plot_local());
    }

    #[test]
    fn test_page_and_extraction_failures_are_plot_local() {
        let err: Error = PageError::HttpStatus {
            url: "http://portal.test/Portal/Plot/9".to_string(),
            status: 404,
        }
        .into();
        assert!(err.is_plot_local());

        let err: Error = ExtractError::SectionNotFound {
            heading: "Auction Details".to_string(),
        }
        .into();
        assert!(err.is_plot_local());

        let err: Error = ExtractError::from(PageError::not_found("table")).into();
        assert!(err.is_plot_local());
    }
}
