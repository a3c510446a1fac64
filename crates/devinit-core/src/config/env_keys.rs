//! Environment variable key constants.
//!
//! All `DEVINIT_*` keys live here so config readers never spell them inline.

/// Bootstrap pipeline: environment manager, interpreter, task runner.
pub mod bootstrap {
    pub const DEVINIT_PIPENV: &str = "DEVINIT_PIPENV";
    pub const PIPENV_ALIASES: &[&str] = &["PIPENV_BIN"];

    pub const DEVINIT_PYTHON: &str = "DEVINIT_PYTHON";

    pub const DEVINIT_CONFIG: &str = "DEVINIT_CONFIG";

    pub const DEVINIT_TASK_RUNNER: &str = "DEVINIT_TASK_RUNNER";
    pub const DEVINIT_TASK_RUNNER_PACKAGE: &str = "DEVINIT_TASK_RUNNER_PACKAGE";
    pub const DEVINIT_INIT_TASK: &str = "DEVINIT_INIT_TASK";

    /// Forwarded to pipenv as `PIPENV_VENV_IN_PROJECT=1` when true.
    pub const DEVINIT_VENV_IN_PROJECT: &str = "DEVINIT_VENV_IN_PROJECT";
}

/// Paths
pub mod paths {
    pub const DEVINIT_PROJECT_DIR: &str = "DEVINIT_PROJECT_DIR";
}

/// Observability and logging
pub mod observability {
    pub const DEVINIT_QUIET: &str = "DEVINIT_QUIET";
    pub const DEVINIT_LOG_LEVEL: &str = "DEVINIT_LOG_LEVEL";
    pub const DEVINIT_LOG_JSON: &str = "DEVINIT_LOG_JSON";
    pub const DEVINIT_AUDIT_LOG: &str = "DEVINIT_AUDIT_LOG";
}

/// Variables devinit sets on child processes rather than reads.
pub mod forwarded {
    pub const PIPENV_VENV_IN_PROJECT: &str = "PIPENV_VENV_IN_PROJECT";
}
