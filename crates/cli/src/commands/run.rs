//! `flowcheck run`: execute plans against the application under test

use anyhow::{bail, Context, Result};
use clap::Args;
use flowcheck_e2e::http::HttpSession;
use flowcheck_e2e::results::write_results;
use flowcheck_e2e::{
    FailureMode, FlowRunner, MismatchPolicy, ReportRenderer, RunSummary, TestPlan,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::FlowcheckConfig;
use crate::output::{print_error, print_info, print_success};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Plan file or directory of plans (repeatable)
    #[arg(long = "plan", default_value = "plans")]
    pub plans: Vec<PathBuf>,

    /// Base URL of the application under test
    #[arg(long, env = "FLOWCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Keep running later suites after one fails
    #[arg(long, env = "FLOWCHECK_ISOLATE_SUITES")]
    pub isolate_suites: bool,

    /// Record a failure when a conditional URL check does not match
    #[arg(long, env = "FLOWCHECK_RECORD_MISMATCHES")]
    pub record_mismatches: bool,

    /// Disable colored report output
    #[arg(long, env = "FLOWCHECK_NO_COLOR")]
    pub no_color: bool,

    /// Directory for step snapshots
    #[arg(long, env = "FLOWCHECK_SCREENSHOTS")]
    pub screenshots: Option<PathBuf>,

    /// Directory for the results file
    #[arg(long, env = "FLOWCHECK_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the file configuration
    pub fn apply(&self, config: &mut FlowcheckConfig) {
        if let Some(url) = &self.base_url {
            config.run.base_url = url.clone();
        }
        if self.isolate_suites {
            config.run.failure_mode = FailureMode::IsolateSuites;
        }
        if self.record_mismatches {
            config.run.url_mismatch = MismatchPolicy::RecordFailure;
        }
        if self.no_color {
            config.report.color = false;
        }
        if let Some(dir) = &self.screenshots {
            config.run.screenshots_dir = dir.clone();
        }
        if let Some(dir) = &self.output {
            config.run.output_dir = dir.clone();
        }
    }
}

/// Run every plan and return whether all records passed
pub async fn execute(args: RunArgs, mut config: FlowcheckConfig) -> Result<bool> {
    args.apply(&mut config);
    config.run.validate()?;

    let mut plans = Vec::new();
    for path in &args.plans {
        let loaded = TestPlan::load(path)
            .with_context(|| format!("loading plans from {}", path.display()))?;
        plans.extend(loaded);
    }
    if plans.is_empty() {
        bail!("no plans found");
    }

    for plan in &plans {
        info!("Loaded plan '{}' ({} step(s))", plan.name, plan.step_count());
    }

    let session = HttpSession::new(config.http.session_config())?;
    let renderer = ReportRenderer::new().with_color(config.report.color);
    let runner = FlowRunner::new(config.run.clone())
        .with_renderer(renderer)
        .with_suites(plans.into_iter().flat_map(TestPlan::into_suites));

    let mut summary = runner.execute(Box::new(session)).await;
    let path = finish(
        &runner,
        &mut summary,
        &mut std::io::stdout(),
        &config.run.output_dir,
    )?;
    print_info(&format!("Results written to {}", path.display()));

    if summary.success() {
        print_success("All tests passed");
    } else {
        print_error(&format!("{} test(s) failed", summary.tally.failed));
    }
    Ok(summary.success())
}

/// Print the report, then persist the results even if printing failed
pub fn finish<W: Write>(
    runner: &FlowRunner,
    summary: &mut RunSummary,
    out: &mut W,
    dir: &Path,
) -> Result<PathBuf> {
    let reported = runner.report(summary, out);
    let path = write_results(summary, dir)?;
    reported?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use flowcheck_e2e::http::{HttpSession, HttpSessionConfig};
    use flowcheck_e2e::results::{read_results, RESULTS_FILE};
    use flowcheck_e2e::{ArtifactCapture, RunPhase, RunnerConfig};

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_results_survive_report_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = FlowRunner::new(RunnerConfig {
            echo: false,
            ..Default::default()
        })
        .with_capture(ArtifactCapture::disabled());
        let session = HttpSession::new(HttpSessionConfig::default()).unwrap();
        let mut summary = runner.execute(Box::new(session)).await;

        let result = finish(&runner, &mut summary, &mut ClosedPipe, tmp.path());

        assert!(result.is_err());
        let saved = read_results(&tmp.path().join(RESULTS_FILE)).unwrap();
        assert_eq!(saved.run_id, summary.run_id);
        assert_eq!(saved.phases.last(), Some(&RunPhase::Done));
    }

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn test_flags_override_file_values() {
        let harness = Harness::parse_from([
            "flowcheck",
            "--base-url",
            "https://staging.example/",
            "--isolate-suites",
            "--record-mismatches",
            "--no-color",
            "--output",
            "out",
        ]);
        let mut config = FlowcheckConfig::default();
        harness.run.apply(&mut config);

        assert_eq!(config.run.base_url, "https://staging.example/");
        assert_eq!(config.run.failure_mode, FailureMode::IsolateSuites);
        assert_eq!(config.run.url_mismatch, MismatchPolicy::RecordFailure);
        assert!(!config.report.color);
        assert_eq!(config.run.output_dir, PathBuf::from("out"));
        assert_eq!(harness.run.plans, [PathBuf::from("plans")]);
    }

    #[test]
    fn test_no_flags_keep_file_values() {
        let harness = Harness::parse_from(["flowcheck", "--plan", "a.yaml", "--plan", "b.yaml"]);
        let mut config = FlowcheckConfig::default();
        config.run.base_url = "http://localhost:8080/".to_string();
        harness.run.apply(&mut config);

        assert_eq!(config.run.base_url, "http://localhost:8080/");
        assert_eq!(config.run.failure_mode, FailureMode::AbortRun);
        assert!(config.report.color);
        assert_eq!(harness.run.plans.len(), 2);
    }
}
