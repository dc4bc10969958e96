//! Handle to the application under test

use async_trait::async_trait;

use crate::error::FlowResult;

/// The browser (or browser-like) session a run drives.
///
/// A run owns exactly one session and hands it to steps one at a time. The
/// runner closes it during cleanup whatever the run's outcome.
#[async_trait]
pub trait Session: Send {
    /// Load the given absolute URL
    async fn navigate(&mut self, url: &str) -> FlowResult<()>;

    /// URL of the currently loaded page
    async fn current_url(&mut self) -> FlowResult<String>;

    /// Source text of the currently loaded page
    async fn page_source(&mut self) -> FlowResult<String>;

    /// Visual snapshot of the current state, encoded as `artifact_extension`
    async fn snapshot(&mut self) -> FlowResult<Vec<u8>>;

    /// File extension of the bytes returned by `snapshot`
    fn artifact_extension(&self) -> &'static str {
        "png"
    }

    /// Release the session
    async fn close(&mut self) -> FlowResult<()>;
}
