//! Declarative YAML test plans

use async_trait::async_trait;
use flowcheck_common::SuiteCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{FlowError, FlowResult};
use crate::runner::{RunContext, Suite};
use crate::step::{Checkpoint, Guarded, Pass, Sequence, StepAction};

/// A complete plan parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPlan {
    /// Unique name for this plan
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Suites to execute in order
    pub suites: Vec<SuitePlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitePlan {
    pub category: SuiteCategory,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// A single declarative step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanStep {
    /// Navigate to a URL (relative to base); records a pass under `record`
    Navigate {
        url: String,
        #[serde(default)]
        record: Option<String>,
        #[serde(default)]
        soft: bool,
    },

    /// Conditional URL check
    ExpectUrl { url: String, record: String },

    /// Assert the page source contains some text; records pass or fail
    ExpectText { contains: String, record: String },

    /// Best-effort snapshot
    Snapshot { label: String },

    /// Wait for a fixed amount of time
    Sleep { ms: u64 },

    /// Log a message (for debugging)
    Log { message: String },

    /// Composite flow; `soft` records its failure instead of propagating it
    Group {
        name: String,
        #[serde(default)]
        soft: bool,
        #[serde(default)]
        record: Option<String>,
        steps: Vec<PlanStep>,
    },
}

impl PlanStep {
    /// Convert into an executable step, applying `soft` and group semantics
    pub fn into_action(self) -> Box<dyn StepAction> {
        match self {
            PlanStep::Group {
                name,
                soft,
                record,
                steps,
            } => {
                let mut flow = Sequence::new(name.clone())
                    .with_steps(steps.into_iter().map(PlanStep::into_action).collect());
                if let Some(record) = record {
                    flow = flow.step(Pass::new(record));
                }
                if soft {
                    Box::new(Guarded::new(name, flow))
                } else {
                    Box::new(flow)
                }
            }
            PlanStep::Navigate {
                url,
                record,
                soft: true,
            } => {
                let name = record
                    .clone()
                    .unwrap_or_else(|| format!("Navigate to {}", url));
                Box::new(Guarded::new(
                    name,
                    PlanStep::Navigate {
                        url,
                        record,
                        soft: false,
                    },
                ))
            }
            PlanStep::Snapshot { label } => Box::new(Checkpoint::new(label)),
            step => Box::new(step),
        }
    }
}

#[async_trait]
impl StepAction for PlanStep {
    fn describe(&self) -> String {
        match self {
            PlanStep::Navigate { url, .. } => format!("navigate:{}", url),
            PlanStep::ExpectUrl { url, .. } => format!("expect_url:{}", url),
            PlanStep::ExpectText { contains, .. } => format!("expect_text:{}", contains),
            PlanStep::Snapshot { label } => format!("snapshot:{}", label),
            PlanStep::Sleep { ms } => format!("sleep:{}ms", ms),
            PlanStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
            PlanStep::Group { name, .. } => format!("group:{}", name),
        }
    }

    async fn run(&self, ctx: &mut RunContext) -> FlowResult<()> {
        match self {
            PlanStep::Navigate {
                url,
                record,
                soft: false,
            } => {
                ctx.navigate(url).await?;
                if let Some(name) = record {
                    ctx.pass(name.clone());
                }
                Ok(())
            }
            PlanStep::Navigate { soft: true, .. } | PlanStep::Group { .. } => {
                self.clone().into_action().run(ctx).await
            }
            PlanStep::ExpectUrl { url, record } => {
                ctx.expect_url(record, url).await?;
                Ok(())
            }
            PlanStep::ExpectText { contains, record } => {
                let source = ctx.session().page_source().await?;
                if source.contains(contains.as_str()) {
                    ctx.pass(record.clone());
                } else {
                    let failure =
                        FlowError::AssertionFailed(format!("'{}' not found on page", contains));
                    ctx.fail(record.clone(), failure.to_string());
                }
                Ok(())
            }
            PlanStep::Snapshot { label } => {
                let _ = ctx.capture(label).await;
                Ok(())
            }
            PlanStep::Sleep { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(())
            }
            PlanStep::Log { message } => {
                info!("[TEST LOG] {}", message);
                Ok(())
            }
        }
    }
}

impl TestPlan {
    /// Parse a plan from YAML string
    pub fn from_yaml(yaml: &str) -> FlowResult<Self> {
        let plan: Self = serde_yaml::from_str(yaml)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Parse a plan from a YAML file
    pub fn from_file(path: &Path) -> FlowResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| FlowError::PlanParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all plans from a directory, ordered by path
    pub fn load_all(dir: &Path) -> FlowResult<Vec<Self>> {
        let mut paths = Vec::new();
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry.map_err(std::io::Error::from)?;
            let is_plan = entry
                .path()
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            if is_plan {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::from_file(p)).collect()
    }

    /// Load a single plan file, or every plan below a directory
    pub fn load(path: &Path) -> FlowResult<Vec<Self>> {
        if path.is_dir() {
            Self::load_all(path)
        } else {
            Ok(vec![Self::from_file(path)?])
        }
    }

    fn validate(&self) -> FlowResult<()> {
        if self.suites.is_empty() {
            return Err(FlowError::PlanParse(format!(
                "plan '{}' has no suites",
                self.name
            )));
        }
        if let Some(suite) = self
            .suites
            .iter()
            .find(|s| s.category == SuiteCategory::Execution)
        {
            return Err(FlowError::PlanParse(format!(
                "plan '{}': category '{}' is reserved",
                self.name,
                suite.category.key()
            )));
        }
        Ok(())
    }

    /// Total number of steps, counting inside groups
    pub fn step_count(&self) -> usize {
        fn count(steps: &[PlanStep]) -> usize {
            steps
                .iter()
                .map(|s| match s {
                    PlanStep::Group { steps, .. } => 1 + count(steps),
                    _ => 1,
                })
                .sum()
        }
        self.suites.iter().map(|s| count(&s.steps)).sum()
    }

    /// Convert into executable suites
    pub fn into_suites(self) -> Vec<Suite> {
        self.suites
            .into_iter()
            .map(|suite| {
                Suite::new(suite.category)
                    .with_steps(suite.steps.into_iter().map(PlanStep::into_action).collect())
            })
            .collect()
    }
}
