//! Flowcheck E2E Engine
//!
//! This crate drives scripted user journeys against a running web
//! application and reports the outcome of every step:
//! - Sequences steps into ordered suites and runs them against one session
//! - Bounds failures so a run always reaches session cleanup
//! - Captures best-effort snapshots at checkpoints
//! - Renders a suite-grouped report with pass/fail totals
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        FlowRunner                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run(session, out)                                          │
//! │    ├── Initialized                                          │
//! │    ├── Running(suite) ── run_suite -> [StepAction]          │
//! │    │        │ error escapes: synthetic Failed record        │
//! │    ├── Cleanup ── session.close()     (always)              │
//! │    └── Reported ── ReportRenderer::render(log)  (always)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RunContext: base URL, ResultLog, Session, ArtifactCapture  │
//! │  Steps: PlanStep (YAML), Sequence, Guarded, Pass, Checkpoint│
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod capture;
pub mod error;
pub mod http;
pub mod plan;
pub mod report;
pub mod results;
pub mod runner;
pub mod session;
pub mod step;

pub use capture::{ArtifactCapture, ArtifactSink, CaptureStatus, FsArtifactSink};
pub use error::{FlowError, FlowResult};
pub use plan::{PlanStep, TestPlan};
pub use report::{ReportRenderer, Tally};
pub use runner::{
    FailureMode, FlowRunner, MismatchPolicy, RunContext, RunPhase, RunSummary, RunnerConfig, Suite,
};
pub use session::Session;
pub use step::{Checkpoint, Guarded, Pass, Sequence, StepAction};
