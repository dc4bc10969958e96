//! `flowcheck init-config`: write a default configuration file

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::FlowcheckConfig;
use crate::output::{print_success, print_warning};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the file (defaults to the global --config path)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs, default_path: PathBuf) -> Result<()> {
    let path = args.path.unwrap_or(default_path);
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if path.exists() {
        print_warning(&format!("Overwriting {}", path.display()));
    }

    FlowcheckConfig::default().save(&path)?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}
