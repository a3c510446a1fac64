//! Environment manager integration.
//!
//! [`EnvironmentManager`] is the seam between the bootstrap pipeline and the
//! external tool that owns the virtual environment. [`Pipenv`] is the only
//! implementation; the environment directory's lifecycle belongs to pipenv.

use std::path::{Path, PathBuf};

use devinit_core::config::env_keys::forwarded;
use devinit_core::config::BootstrapConfig;

use crate::error::EnvError;
use crate::runner::{run_checked, CommandOutput, CommandRunner, CommandSpec};

pub trait EnvironmentManager {
    fn name(&self) -> &str;

    /// Create the isolated environment for `python`, or reuse it, and sync
    /// the manifest.
    fn ensure_environment(&self, python: &str) -> Result<(), EnvError>;

    /// Install one requirement (e.g. `invoke>=1.0.0`) into the environment.
    fn install(&self, requirement: &str) -> Result<(), EnvError>;

    /// Run `argv` inside the environment with output streamed. A non-zero
    /// exit is reported in the output, not as an error.
    fn run_in_env(&self, argv: &[String], step: &'static str) -> Result<CommandOutput, EnvError>;
}

pub struct Pipenv<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    project_dir: PathBuf,
    venv_in_project: bool,
}

impl<'a> Pipenv<'a> {
    pub fn new(runner: &'a dyn CommandRunner, cfg: &BootstrapConfig, project_dir: &Path) -> Self {
        Self {
            runner,
            program: cfg.pipenv.clone(),
            project_dir: project_dir.to_path_buf(),
            venv_in_project: cfg.venv_in_project,
        }
    }

    fn command(&self, step: &'static str) -> CommandSpec {
        let spec = CommandSpec::new(&self.program, &self.project_dir, step);
        if self.venv_in_project {
            spec.env(forwarded::PIPENV_VENV_IN_PROJECT, "1")
        } else {
            spec
        }
    }
}

impl EnvironmentManager for Pipenv<'_> {
    fn name(&self) -> &str {
        &self.program
    }

    fn ensure_environment(&self, python: &str) -> Result<(), EnvError> {
        run_checked(self.runner, &self.command("bootstrap").args(["--python", python]))?;
        run_checked(self.runner, &self.command("bootstrap").arg("install"))?;
        Ok(())
    }

    fn install(&self, requirement: &str) -> Result<(), EnvError> {
        run_checked(self.runner, &self.command("bootstrap").args(["install", requirement]))?;
        Ok(())
    }

    fn run_in_env(&self, argv: &[String], step: &'static str) -> Result<CommandOutput, EnvError> {
        let spec = self.command(step).arg("run").args(argv.iter().cloned());
        self.runner.run(&spec)
    }
}
