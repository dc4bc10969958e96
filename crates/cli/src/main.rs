//! Flowcheck CLI - Main Entry Point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use flowcheck_cli::commands::{init, plan, render, run};
use flowcheck_cli::config::FlowcheckConfig;

/// Flowcheck - end-to-end workflow verifier for web applications
#[derive(Parser)]
#[command(name = "flowcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "FLOWCHECK_CONFIG",
        default_value_os_t = flowcheck_common::default_config_path()
    )]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test plans against the application
    Run(run::RunArgs),

    /// Re-render the report of a saved run
    Render(render::RenderArgs),

    /// Show the suites and steps of a plan
    Plan(plan::PlanArgs),

    /// Write a default configuration file
    InitConfig(init::InitArgs),
}

fn init_tracing(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = FlowcheckConfig::load(&cli.config)?;
    if !config.report.color {
        colored::control::set_override(false);
    }

    let passed = match cli.command {
        Commands::Run(args) => {
            if args.no_color {
                colored::control::set_override(false);
            }
            run::execute(args, config).await?
        }
        Commands::Render(args) => render::execute(args, &config)?,
        Commands::Plan(args) => {
            plan::execute(args)?;
            true
        }
        Commands::InitConfig(args) => {
            init::execute(args, cli.config)?;
            true
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
