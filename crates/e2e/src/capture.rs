//! Best-effort artifact capture at diagnostic checkpoints

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::FlowResult;
use crate::session::Session;

/// Destination for captured artifacts
pub trait ArtifactSink: Send + Sync {
    /// Persist `bytes` under a location derived from `label`
    fn store(&self, label: &str, extension: &str, bytes: &[u8]) -> FlowResult<PathBuf>;
}

/// Writes artifacts as `<dir>/<label>.<extension>`.
///
/// A repeated label overwrites the earlier artifact.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact with this label and extension is written to
    pub fn path_for(&self, label: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", sanitize_label(label), extension))
    }
}

impl ArtifactSink for FsArtifactSink {
    fn store(&self, label: &str, extension: &str, bytes: &[u8]) -> FlowResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(label, extension);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Map a label onto a single safe file stem
pub fn sanitize_label(label: &str) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "artifact".to_string()
    } else {
        stem
    }
}

/// What happened to a capture request. Callers are expected to ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    Saved(PathBuf),
    Failed(String),
    Disabled,
}

/// Snapshot capability handed to steps through the run context
#[derive(Clone, Default)]
pub struct ArtifactCapture {
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl ArtifactCapture {
    pub fn new(sink: impl ArtifactSink + 'static) -> Self {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    /// Capture into a directory on disk
    pub fn to_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FsArtifactSink::new(dir))
    }

    /// Capture nothing
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Snapshot the session and store it under `label`.
    ///
    /// Never fails: errors are logged and reported through the status.
    pub async fn capture(&self, session: &mut dyn Session, label: &str) -> CaptureStatus {
        let Some(sink) = &self.sink else {
            return CaptureStatus::Disabled;
        };

        let bytes = match session.snapshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Error taking snapshot '{}': {}", label, e);
                return CaptureStatus::Failed(e.to_string());
            }
        };

        match sink.store(label, session.artifact_extension(), &bytes) {
            Ok(path) => {
                debug!("Snapshot taken and saved as {}", path.display());
                CaptureStatus::Saved(path)
            }
            Err(e) => {
                warn!("Error saving snapshot '{}': {}", label, e);
                CaptureStatus::Failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for ArtifactCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCapture")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use async_trait::async_trait;

    struct StillPage {
        bytes: Option<Vec<u8>>,
    }

    #[async_trait]
    impl Session for StillPage {
        async fn navigate(&mut self, _url: &str) -> FlowResult<()> {
            Ok(())
        }

        async fn current_url(&mut self) -> FlowResult<String> {
            Ok("http://localhost/".to_string())
        }

        async fn page_source(&mut self) -> FlowResult<String> {
            Ok(String::new())
        }

        async fn snapshot(&mut self) -> FlowResult<Vec<u8>> {
            self.bytes
                .clone()
                .ok_or_else(|| FlowError::Session("driver went away".to_string()))
        }

        async fn close(&mut self) -> FlowResult<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl ArtifactSink for BrokenSink {
        fn store(&self, _label: &str, _extension: &str, _bytes: &[u8]) -> FlowResult<PathBuf> {
            Err(FlowError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("admin_dashboard"), "admin_dashboard");
        assert_eq!(sanitize_label("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_label("add item form"), "add_item_form");
        assert_eq!(sanitize_label("  "), "artifact");
    }

    #[tokio::test]
    async fn test_capture_creates_directory_and_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("screenshots");
        let capture = ArtifactCapture::to_dir(&dir);
        let mut session = StillPage {
            bytes: Some(vec![1, 2, 3]),
        };

        let status = capture.capture(&mut session, "home_page").await;

        let expected = dir.join("home_page.png");
        assert_eq!(status, CaptureStatus::Saved(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_repeated_label_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let capture = ArtifactCapture::to_dir(tmp.path());

        let mut first = StillPage {
            bytes: Some(b"first".to_vec()),
        };
        let mut second = StillPage {
            bytes: Some(b"second".to_vec()),
        };
        let _ = capture.capture(&mut first, "add_item").await;
        let _ = capture.capture(&mut second, "add_item").await;

        let written = std::fs::read(tmp.path().join("add_item.png")).unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_snapshot_failure_is_reported_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        let capture = ArtifactCapture::to_dir(tmp.path());
        let mut session = StillPage { bytes: None };

        let status = capture.capture(&mut session, "about_page").await;

        assert!(matches!(status, CaptureStatus::Failed(msg) if msg.contains("driver went away")));
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported_not_raised() {
        let capture = ArtifactCapture::new(BrokenSink);
        let mut session = StillPage {
            bytes: Some(vec![0]),
        };

        let status = capture.capture(&mut session, "login_page").await;

        assert!(matches!(status, CaptureStatus::Failed(msg) if msg.contains("read-only")));
    }

    #[tokio::test]
    async fn test_disabled_capture_does_nothing() {
        let mut session = StillPage { bytes: None };
        let status = ArtifactCapture::disabled()
            .capture(&mut session, "anything")
            .await;
        assert_eq!(status, CaptureStatus::Disabled);
    }
}
