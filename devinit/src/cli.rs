use std::path::PathBuf;

use clap::Parser;
use devinit_core::config::env_keys::paths;

/// devinit - bootstrap a Python project's development environment
#[derive(Parser, Debug)]
#[command(name = "devinit")]
#[command(version, about, long_about = None)]
#[command(after_help = "Initialize the project by:
  1. checking the interpreter against init_config.yaml (if present)
  2. creating or reusing the pipenv environment and installing invoke
  3. scaffolding invoke.py and tasks.py when missing
  4. running 'inv init'
  5. running COMMAND inside the environment, if given")]
pub struct Cli {
    /// Project directory to initialize
    #[arg(short = 'C', long, value_name = "DIR", env = paths::DEVINIT_PROJECT_DIR, default_value = ".")]
    pub project_dir: PathBuf,

    /// Python interpreter to check and build the environment with (default: python3/python on PATH)
    #[arg(long, value_name = "PROGRAM")]
    pub python: Option<String>,

    /// Version policy file, relative to the project directory (default: init_config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to execute inside the environment after initialization
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}
