//! Error types for the transform module

use thiserror::Error;

use crate::fields::Field;

/// Error type for record transformation
#[derive(Debug, Error)]
pub enum TransformError {
    /// A numeric field held no leading number
    #[error("cannot parse `{value}` as a number for {field}")]
    Parse {
        /// Column being parsed
        field: Field,
        /// Text as scraped
        value: String,
    },

    /// A calculation needed a number the record does not hold
    #[error("{0} is not numeric")]
    NotNumeric(Field),

    /// A column was never filled
    #[error("no value for {0}")]
    MissingField(Field),

    /// The raw record does not line up with the field specs
    #[error("expected {expected} raw values, got {found}")]
    RecordLength {
        /// Number of field specs
        expected: usize,
        /// Number of scraped values
        found: usize,
    },
}
