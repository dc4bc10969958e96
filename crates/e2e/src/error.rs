//! Error types for flow execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("No page has been loaded yet")]
    NoPage,

    #[error("Session is already closed")]
    SessionClosed,

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Step panicked: {step} - {reason}")]
    StepPanicked { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Plan parse error: {0}")]
    PlanParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
