//! Flow runner: sequences suites, bounds failures, always reaches cleanup

use chrono::{DateTime, Utc};
use flowcheck_common::{Outcome, ResultLog, ResultRecord, SuiteCategory};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::capture::{ArtifactCapture, CaptureStatus};
use crate::error::{FlowError, FlowResult};
use crate::report::{ReportRenderer, Tally};
use crate::session::Session;
use crate::step::{run_step, StepAction};

/// Test name of the synthetic record written when a failure escapes a suite
pub const EXECUTION_TEST_NAME: &str = "Test Execution";

/// What happens to the remaining suites when a failure escapes one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Record the failure once and skip every remaining suite
    #[default]
    AbortRun,
    /// Record the failure and carry on with the next suite
    IsolateSuites,
}

/// What a conditional URL assertion does when the URL does not match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Emit no record
    #[default]
    Skip,
    /// Emit a failed record naming both URLs
    RecordFailure,
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "suite", rename_all = "snake_case")]
pub enum RunPhase {
    Initialized,
    Running(SuiteCategory),
    Cleanup,
    Reported,
    Done,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Initialized => write!(f, "initialized"),
            RunPhase::Running(suite) => write!(f, "running({})", suite.key()),
            RunPhase::Cleanup => write!(f, "cleanup"),
            RunPhase::Reported => write!(f, "reported"),
            RunPhase::Done => write!(f, "done"),
        }
    }
}

/// Configuration for the flow runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Base URL every relative navigation is resolved against
    pub base_url: String,
    pub failure_mode: FailureMode,
    pub url_mismatch: MismatchPolicy,
    /// Echo each result as it is recorded
    pub echo: bool,
    pub screenshots_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200/".to_string(),
            failure_mode: FailureMode::default(),
            url_mismatch: MismatchPolicy::default(),
            echo: true,
            screenshots_dir: flowcheck_common::default_screenshots_dir(),
            output_dir: flowcheck_common::default_output_dir(),
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> FlowResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FlowError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Resolve `path` against `base`. Absolute URLs are returned unchanged.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// A named group of steps
pub struct Suite {
    pub category: SuiteCategory,
    pub steps: Vec<Box<dyn StepAction>>,
}

impl Suite {
    pub fn new(category: SuiteCategory) -> Self {
        Self {
            category,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl StepAction + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn with_steps(mut self, steps: Vec<Box<dyn StepAction>>) -> Self {
        self.steps.extend(steps);
        self
    }
}

/// State owned by a single run: base URL, result log and session handle
pub struct RunContext {
    base_url: String,
    log: ResultLog,
    session: Box<dyn Session>,
    capture: ArtifactCapture,
    category: SuiteCategory,
    mismatch: MismatchPolicy,
    phases: Vec<RunPhase>,
    closed: bool,
}

impl RunContext {
    pub fn new(session: Box<dyn Session>, capture: ArtifactCapture, config: &RunnerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            log: ResultLog::new().with_echo(config.echo),
            session,
            capture,
            category: SuiteCategory::Basic,
            mismatch: config.url_mismatch,
            phases: vec![RunPhase::Initialized],
            closed: false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn session(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    /// Suite currently being executed
    pub fn category(&self) -> SuiteCategory {
        self.category
    }

    pub fn phase(&self) -> RunPhase {
        self.phases.last().copied().unwrap_or(RunPhase::Initialized)
    }

    pub fn phases(&self) -> &[RunPhase] {
        &self.phases
    }

    /// Record a result in the active suite
    pub fn record(
        &mut self,
        test_name: impl Into<String>,
        outcome: Outcome,
        message: Option<String>,
    ) -> &ResultRecord {
        let category = self.category;
        self.log.record(test_name, outcome, category, message)
    }

    /// Record a result in an explicit category
    pub fn record_in(
        &mut self,
        test_name: impl Into<String>,
        outcome: Outcome,
        category: SuiteCategory,
        message: Option<String>,
    ) -> &ResultRecord {
        self.log.record(test_name, outcome, category, message)
    }

    pub fn pass(&mut self, test_name: impl Into<String>) {
        self.record(test_name, Outcome::Passed, None);
    }

    pub fn fail(&mut self, test_name: impl Into<String>, message: impl Into<String>) {
        self.record(test_name, Outcome::Failed, Some(message.into()));
    }

    /// Navigate the session to a path relative to the base URL
    pub async fn navigate(&mut self, path: &str) -> FlowResult<()> {
        let url = self.url_for(path);
        self.session.navigate(&url).await
    }

    /// Best-effort snapshot of the session under `label`
    pub async fn capture(&mut self, label: &str) -> CaptureStatus {
        self.capture.capture(self.session.as_mut(), label).await
    }

    /// Conditional URL assertion.
    ///
    /// A match records a pass. A mismatch follows the configured
    /// [`MismatchPolicy`]. Returns whether the URL matched.
    pub async fn expect_url(&mut self, test_name: &str, path: &str) -> FlowResult<bool> {
        let expected = self.url_for(path);
        let actual = self.session.current_url().await?;

        if actual == expected {
            self.pass(test_name);
            return Ok(true);
        }

        match self.mismatch {
            MismatchPolicy::Skip => {
                debug!(
                    "Skipping '{}': expected URL {} but was {}",
                    test_name, expected, actual
                );
            }
            MismatchPolicy::RecordFailure => {
                let failure = FlowError::AssertionFailed(format!(
                    "expected URL {} but was {}",
                    expected, actual
                ));
                self.fail(test_name, failure.to_string());
            }
        }
        Ok(false)
    }

    fn transition(&mut self, phase: RunPhase) {
        debug!("Run phase: {} -> {}", self.phase(), phase);
        self.phases.push(phase);
    }

    fn enter(&mut self, category: SuiteCategory) {
        self.category = category;
        self.transition(RunPhase::Running(category));
    }

    /// Close the session. Runs at most once; errors are only logged.
    async fn cleanup(&mut self) {
        if self.closed {
            return;
        }
        self.transition(RunPhase::Cleanup);
        self.closed = true;

        match AssertUnwindSafe(self.session.close()).catch_unwind().await {
            Ok(Ok(())) => debug!("Session closed"),
            Ok(Err(e)) => warn!("Error closing session: {}", e),
            Err(_) => warn!("Session close panicked"),
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Suite whose failure aborted the run, if any
    pub aborted_in: Option<SuiteCategory>,
    pub phases: Vec<RunPhase>,
    pub tally: Tally,
    pub records: ResultLog,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.tally.all_passed()
    }
}

/// Executes suites in order against one session
pub struct FlowRunner {
    config: RunnerConfig,
    suites: Vec<Suite>,
    capture: ArtifactCapture,
    renderer: ReportRenderer,
}

impl FlowRunner {
    /// Create a runner that captures artifacts into the configured directory
    pub fn new(config: RunnerConfig) -> Self {
        let capture = ArtifactCapture::to_dir(&config.screenshots_dir);
        Self {
            config,
            suites: Vec::new(),
            capture,
            renderer: ReportRenderer::default(),
        }
    }

    pub fn with_capture(mut self, capture: ArtifactCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_renderer(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn suite(mut self, suite: Suite) -> Self {
        self.suites.push(suite);
        self
    }

    pub fn with_suites(mut self, suites: impl IntoIterator<Item = Suite>) -> Self {
        self.suites.extend(suites);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Execute one suite's steps in order. The first error ends the suite.
    pub async fn run_suite(&self, suite: &Suite, ctx: &mut RunContext) -> FlowResult<()> {
        ctx.enter(suite.category);
        info!("Running {} ({} step(s))", suite.category, suite.steps.len());

        for step in &suite.steps {
            run_step(step.as_ref(), ctx).await?;
        }
        Ok(())
    }

    /// Run every suite, then close the session. Does not render.
    pub async fn execute(&self, session: Box<dyn Session>) -> RunSummary {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let mut ctx = RunContext::new(session, self.capture.clone(), &self.config);
        let mut aborted_in = None;

        info!(
            "Starting run {} against {} ({} suite(s))",
            run_id,
            ctx.base_url(),
            self.suites.len()
        );

        for suite in &self.suites {
            let Err(e) = self.run_suite(suite, &mut ctx).await else {
                continue;
            };

            error!("{} aborted: {}", suite.category, e);
            match self.config.failure_mode {
                FailureMode::AbortRun => {
                    ctx.record_in(
                        EXECUTION_TEST_NAME,
                        Outcome::Failed,
                        SuiteCategory::Execution,
                        Some(e.to_string()),
                    );
                    aborted_in = Some(suite.category);
                    break;
                }
                FailureMode::IsolateSuites => {
                    ctx.record_in(
                        EXECUTION_TEST_NAME,
                        Outcome::Failed,
                        SuiteCategory::Execution,
                        Some(format!("{}: {}", suite.category, e)),
                    );
                }
            }
        }

        ctx.cleanup().await;

        let records = std::mem::take(&mut ctx.log);
        let tally = Tally::of(records.all());
        RunSummary {
            run_id,
            base_url: ctx.base_url.clone(),
            started_at,
            finished_at: Utc::now(),
            aborted_in,
            phases: ctx.phases.clone(),
            tally,
            records,
        }
    }

    /// Write the report of a finished run to `out`.
    ///
    /// The summary reaches [`RunPhase::Done`] even when writing fails, so
    /// callers can still persist it.
    pub fn report<W: Write>(&self, summary: &mut RunSummary, out: &mut W) -> FlowResult<()> {
        let written = self.renderer.render_to(summary.records.all(), out);
        summary.phases.push(RunPhase::Reported);
        summary.phases.push(RunPhase::Done);

        info!(
            "Run {} finished: {} passed, {} failed",
            summary.run_id, summary.tally.passed, summary.tally.failed
        );
        Ok(written?)
    }

    /// Run every suite, close the session, then write the report to `out`
    pub async fn run<W: Write>(
        &self,
        session: Box<dyn Session>,
        out: &mut W,
    ) -> FlowResult<RunSummary> {
        let mut summary = self.execute(session).await;
        self.report(&mut summary, out)?;
        Ok(summary)
    }
}
