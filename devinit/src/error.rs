//! Top-level error: every failure the init pipeline can surface.

use devinit_core::{ConfigError, PolicyViolation};
use devinit_env::EnvError;
use devinit_fs::ScaffoldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
}

impl InitError {
    /// Exit code for the process: the failing tool's code when an external
    /// command failed, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            InitError::Env(e) => e.exit_code(),
            InitError::Config(_) | InitError::Policy(_) | InitError::Scaffold(_) => 1,
        }
    }
}
