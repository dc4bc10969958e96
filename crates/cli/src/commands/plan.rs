//! `flowcheck plan`: show what a plan would do without running it

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use flowcheck_e2e::{PlanStep, StepAction, TestPlan};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan file or directory of plans
    pub path: PathBuf,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let plans = TestPlan::load(&args.path)
        .with_context(|| format!("loading plans from {}", args.path.display()))?;

    for plan in &plans {
        println!("{} ({} step(s))", plan.name.bold(), plan.step_count());
        if !plan.description.is_empty() {
            println!("  {}", plan.description.bright_black());
        }
        for suite in &plan.suites {
            println!("  {}", suite.category.label().cyan());
            print_steps(&suite.steps, 2);
        }
        println!();
    }
    Ok(())
}

fn print_steps(steps: &[PlanStep], depth: usize) {
    let indent = "  ".repeat(depth);
    for step in steps {
        let soft = match step {
            PlanStep::Navigate { soft: true, .. } | PlanStep::Group { soft: true, .. } => " (soft)",
            _ => "",
        };
        println!("{}- {}{}", indent, step.describe(), soft.yellow());
        if let PlanStep::Group { steps, .. } = step {
            print_steps(steps, depth + 1);
        }
    }
}
