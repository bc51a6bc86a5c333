//! Error types for the extract module

use std::time::Duration;

use thiserror::Error;

use crate::page::PageError;

/// Error type for plot page extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No heading with the section's title
    #[error("section `{heading}` not found")]
    SectionNotFound {
        /// Heading text searched for
        heading: String,
    },

    /// The section table has no such row or column
    #[error("cell {cell} not found")]
    CellNotFound {
        /// Section and 1-based position
        cell: String,
    },

    /// A cell stayed empty for the whole wait window
    #[error("{what} still empty after {waited:?}")]
    Timeout {
        /// What was being waited on
        what: String,
        /// How long we waited
        waited: Duration,
    },

    /// Session or query error
    #[error(transparent)]
    Page(#[from] PageError),
}
