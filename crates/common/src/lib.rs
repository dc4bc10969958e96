//! Flowcheck Common Library
//!
//! Result model shared by the Flowcheck runner and CLI: outcomes, suite
//! categories, immutable result records and the append-only result log.

pub mod error;
pub mod log;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use log::ResultLog;
pub use types::*;

/// Flowcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory for step snapshots
pub fn default_screenshots_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("screenshots")
}

/// Default directory for run results
pub fn default_output_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("test-results")
}

/// Default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    std::path::PathBuf::from("flowcheck.toml")
}
