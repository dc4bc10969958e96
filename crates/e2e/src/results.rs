//! Persisting run summaries as JSON

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::FlowResult;
use crate::runner::RunSummary;

/// File name written into the output directory
pub const RESULTS_FILE: &str = "test-results.json";

/// Write a run summary to `<dir>/test-results.json`
pub fn write_results(summary: &RunSummary, dir: &Path) -> FlowResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(RESULTS_FILE);
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

/// Load a run summary written by [`write_results`]
pub fn read_results(path: &Path) -> FlowResult<RunSummary> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
