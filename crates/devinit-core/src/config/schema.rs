//! Config structs grouped by concern, loaded from environment variables.

use super::env_keys::{bootstrap as boot_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Default project-local policy file name.
pub const DEFAULT_CONFIG_FILE: &str = "init_config.yaml";

/// Settings for the bootstrap pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Environment manager executable.
    pub pipenv: String,
    /// Interpreter program; `None` means detect from `PATH`.
    pub python: Option<String>,
    /// Policy file, relative to the project directory unless absolute.
    pub config_file: PathBuf,
    /// Task runner executable inside the environment.
    pub task_runner: String,
    /// Requirement installed into the environment to provide the task runner.
    pub task_runner_package: String,
    pub init_task: String,
    pub venv_in_project: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            pipenv: "pipenv".to_string(),
            python: None,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            task_runner: "inv".to_string(),
            task_runner_package: "invoke>=1.0.0".to_string(),
            init_task: "init".to_string(),
            venv_in_project: false,
        }
    }
}

impl BootstrapConfig {
    /// Load from environment variables; unset keys keep their defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            pipenv: env_or(boot_keys::DEVINIT_PIPENV, boot_keys::PIPENV_ALIASES, || d.pipenv),
            python: env_optional(boot_keys::DEVINIT_PYTHON, &[]),
            config_file: env_optional(boot_keys::DEVINIT_CONFIG, &[])
                .map(PathBuf::from)
                .unwrap_or(d.config_file),
            task_runner: env_or(boot_keys::DEVINIT_TASK_RUNNER, &[], || d.task_runner),
            task_runner_package: env_or(boot_keys::DEVINIT_TASK_RUNNER_PACKAGE, &[], || {
                d.task_runner_package
            }),
            init_task: env_or(boot_keys::DEVINIT_INIT_TASK, &[], || d.init_task),
            venv_in_project: env_bool(boot_keys::DEVINIT_VENV_IN_PROJECT, &[], d.venv_in_project),
        }
    }

    /// CLI flags win over environment values.
    pub fn with_cli_overrides(mut self, python: Option<String>, config: Option<PathBuf>) -> Self {
        if let Some(p) = python {
            self.python = Some(p);
        }
        if let Some(c) = config {
            self.config_file = c;
        }
        self
    }

    /// The init task name becomes a Python function name in the scaffolded
    /// `tasks.py`: letters, digits, `_` and `-`, not starting with a digit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.init_task.as_str();
        let valid = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidSetting {
                key: boot_keys::DEVINIT_INIT_TASK,
                value: name.to_string(),
                reason: "expected a Python identifier (dashes allowed)".to_string(),
            })
        }
    }
}

/// Observability config: quiet, log_level, log_json, audit_log.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    /// Cached for the life of the process.
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(obv_keys::DEVINIT_QUIET, &[], false),
            log_level: env_or(obv_keys::DEVINIT_LOG_LEVEL, &[], || "devinit=info".to_string()),
            log_json: env_bool(obv_keys::DEVINIT_LOG_JSON, &[], false),
            audit_log: env_optional(obv_keys::DEVINIT_AUDIT_LOG, &[]),
        })
    }
}
