//! Validator error types.

use novella_core::error::ContentError;
use thiserror::Error;

/// Startup errors for the validator. Content-quality issues are never
/// errors; they are collected in the report.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Content could not be loaded, or contains malformed ids.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Writing the report failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
