//! `flowcheck render`: re-render a saved run

use anyhow::{Context, Result};
use clap::Args;
use flowcheck_e2e::results::read_results;
use flowcheck_e2e::ReportRenderer;
use std::path::PathBuf;

use crate::config::FlowcheckConfig;
use crate::output::print_info;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Results file written by `flowcheck run`
    pub path: PathBuf,

    /// Disable colored report output
    #[arg(long, env = "FLOWCHECK_NO_COLOR")]
    pub no_color: bool,
}

/// Print the report of a saved run and return whether all records passed
pub fn execute(args: RenderArgs, config: &FlowcheckConfig) -> Result<bool> {
    let summary = read_results(&args.path)
        .with_context(|| format!("reading results from {}", args.path.display()))?;

    print_info(&format!(
        "Run {} against {} ({} to {})",
        summary.run_id,
        summary.base_url,
        summary.started_at.format("%Y-%m-%d %H:%M:%S"),
        summary.finished_at.format("%H:%M:%S"),
    ));
    if let Some(suite) = summary.aborted_in {
        print_info(&format!("Aborted in {}", suite));
    }

    let renderer = ReportRenderer::new().with_color(config.report.color && !args.no_color);
    renderer.render_to(summary.records.all(), &mut std::io::stdout())?;
    Ok(summary.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcheck_common::{ResultLog, ResultRecord, SuiteCategory};
    use flowcheck_e2e::http::{HttpSession, HttpSessionConfig};
    use flowcheck_e2e::results::write_results;
    use flowcheck_e2e::{ArtifactCapture, FlowRunner, RunnerConfig, Tally};
    use std::path::Path;

    async fn save_run(dir: &Path, records: Vec<ResultRecord>) -> PathBuf {
        let runner = FlowRunner::new(RunnerConfig {
            echo: false,
            ..Default::default()
        })
        .with_capture(ArtifactCapture::disabled());
        let session = HttpSession::new(HttpSessionConfig::default()).unwrap();

        let mut summary = runner.execute(Box::new(session)).await;
        summary.records = ResultLog::from(records);
        summary.tally = Tally::of(summary.records.all());
        write_results(&summary, dir).unwrap()
    }

    fn args(path: PathBuf) -> RenderArgs {
        RenderArgs {
            path,
            no_color: true,
        }
    }

    #[tokio::test]
    async fn test_failing_run_renders_as_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_run(
            tmp.path(),
            vec![
                ResultRecord::passed("Open Website", SuiteCategory::Basic),
                ResultRecord::failed("Logout", SuiteCategory::Volunteer, "button missing"),
            ],
        )
        .await;

        assert!(!execute(args(path), &FlowcheckConfig::default()).unwrap());
    }

    #[tokio::test]
    async fn test_passing_run_renders_as_passed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_run(
            tmp.path(),
            vec![ResultRecord::passed("Open Website", SuiteCategory::Basic)],
        )
        .await;

        assert!(execute(args(path), &FlowcheckConfig::default()).unwrap());
    }

    #[test]
    fn test_missing_results_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("test-results.json");
        assert!(execute(args(missing), &FlowcheckConfig::default()).is_err());
    }
}
