//! devinit CLI library: argument parsing, the init pipeline and exit-code
//! mapping. `main.rs` only prints the error and exits.

mod cli;
pub mod commands;
mod error;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use devinit_core::config::{self, BootstrapConfig};
use devinit_core::observability;
use devinit_env::SystemRunner;

use commands::init::{cmd_init, run_command, InitOptions};
pub use error::InitError;

/// Parse arguments, initialize the project and run the trailing command,
/// if any. The returned code is the trailing command's status, or success.
pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();

    let project_dir = cli
        .project_dir
        .canonicalize()
        .with_context(|| format!("Project directory '{}' is not accessible", cli.project_dir.display()))?;
    let dotenv_vars = config::load_dotenv_from_dir(&project_dir);
    observability::init_tracing();
    tracing::debug!(dir = %project_dir.display(), loaded = dotenv_vars, "loaded .env");

    let opts = InitOptions {
        project_dir,
        bootstrap: BootstrapConfig::from_env().with_cli_overrides(cli.python, cli.config),
        command: cli.command,
    };
    tracing::debug!(?opts, "starting devinit");

    let runner = SystemRunner;
    cmd_init(&opts, &runner)?;

    if opts.command.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    let code = run_command(&opts, &runner)?;
    Ok(ExitCode::from(exit_byte(code)))
}

/// Map a child exit status to a process exit byte. `None` (killed by a
/// signal) and codes outside 1..=255 become 1 so a failure never reads as 0.
pub fn exit_byte(code: Option<i32>) -> u8 {
    match code {
        Some(0) => 0,
        Some(c) => u8::try_from(c).unwrap_or(1),
        None => 1,
    }
}
