//! Subprocess execution behind the [`CommandRunner`] seam.
//!
//! Every external call yields a [`CommandOutput`]; callers decide whether a
//! non-zero exit is an error via [`CommandOutput::into_checked`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use devinit_core::observability;

use crate::error::EnvError;

/// How child stdio is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit the parent's stdio so output streams to the console.
    Inherit,
    /// Capture stdout/stderr for inspection.
    Capture,
}

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
    pub mode: OutputMode,
    /// Pipeline step, for logs and the audit trail.
    pub step: &'static str,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: &Path, step: &'static str) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            envs: Vec::new(),
            mode: OutputMode::Inherit,
            step,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn capture(mut self) -> Self {
        self.mode = OutputMode::Capture;
        self
    }

    /// Program and arguments as one shell-readable line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote an argument when it is empty or contains whitespace or quotes.
fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if needs_quotes {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Result of one external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut s = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !s.is_empty() && !s.ends_with('\n') {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }

    /// Turn a non-zero exit into [`EnvError::CommandFailed`].
    pub fn into_checked(self) -> Result<Self, EnvError> {
        if self.success() {
            Ok(self)
        } else {
            Err(EnvError::CommandFailed {
                output: self.combined(),
                command: self.command,
                code: self.code,
            })
        }
    }
}

/// Executes external commands. Errors are reserved for commands that could
/// not be started; exit status is reported in [`CommandOutput`].
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, EnvError>;
}

/// Run `spec` and fail on non-zero exit.
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput, EnvError> {
    runner.run(spec)?.into_checked()
}

/// Runs commands with `std::process::Command`, blocking until exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, EnvError> {
        let command_line = spec.command_line();
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let cwd = spec.cwd.to_string_lossy();
        observability::audit_command_started(spec.step, &spec.program, &spec.args, &cwd);
        tracing::debug!(step = spec.step, command = %command_line, cwd = %cwd, "spawn");
        let started = Instant::now();

        let spawn_err = |e: std::io::Error| {
            if e.kind() == ErrorKind::NotFound {
                EnvError::ProgramNotFound {
                    program: spec.program.clone(),
                    command: command_line.clone(),
                }
            } else {
                EnvError::Spawn {
                    command: command_line.clone(),
                    source: e,
                }
            }
        };

        let output = match spec.mode {
            OutputMode::Inherit => {
                eprintln!("$ {}", command_line);
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_err)?;
                CommandOutput {
                    command: command_line.clone(),
                    code: status.code(),
                    stdout: String::new(),
                    stderr: String::new(),
                }
            }
            OutputMode::Capture => {
                let out = cmd.stdin(Stdio::null()).output().map_err(spawn_err)?;
                CommandOutput {
                    command: command_line.clone(),
                    code: out.status.code(),
                    stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                }
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        observability::audit_command_completed(spec.step, output.code, duration_ms);
        tracing::debug!(
            step = spec.step,
            exit_code = ?output.code,
            duration_ms,
            "exited"
        );
        Ok(output)
    }
}
