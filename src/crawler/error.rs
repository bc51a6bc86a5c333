//! Error types for the crawler module

use crate::error::Error as CrateError;
use crate::page::PageError;
use thiserror::Error;

/// Error type for hierarchy crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The entry listing has no row for the authority
    #[error("authority `{name}` not found in the listing")]
    AuthorityNotFound {
        /// Authority name searched for
        name: String,
    },

    /// A row or control that should carry a link does not
    #[error("no link in {what}")]
    MissingLink {
        /// Where the link was expected
        what: String,
    },

    /// Session or query error
    #[error(transparent)]
    Page(#[from] PageError),

    /// Worker permit could not be acquired
    #[error("Semaphore error: {0}")]
    Semaphore(String),

    /// Worker task failed to complete
    #[error("Task error: {0}")]
    Task(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Page(e) => CrateError::Page(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_crate_error() {
        let err: CrateError = CrawlError::AuthorityNotFound {
            name: "Jaipur Development Authority".to_string(),
        }
        .into();
        assert!(matches!(err, CrateError::Crawl(ref msg) if msg.contains("Jaipur")));

        let err: CrateError = CrawlError::Page(PageError::NoPage).into();
        assert!(matches!(err, CrateError::Page(PageError::NoPage)));
    }
}
