//! Error types for Flowcheck

use thiserror::Error;

/// Result type alias using Flowcheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// Flowcheck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown suite category: {0}")]
    UnknownCategory(String),

    #[error("Unknown outcome: {0}")]
    UnknownOutcome(String),}
