//! Errors from external tool invocation.

use std::fmt;
use std::path::PathBuf;

use devinit_core::VersionParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Program '{program}' not found, command: {command}")]
    ProgramNotFound { program: String, command: String },

    #[error("Failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with {}{}", ExitDescription(.code), OutputSuffix(.output))]
    CommandFailed {
        command: String,
        /// `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Captured output; empty when stdio was passed through.
        output: String,
    },

    #[error("No Python interpreter found on PATH (tried: {tried})")]
    InterpreterNotFound { tried: String },

    #[error("Could not determine the version of '{program}'")]
    UnknownVersion {
        program: String,
        #[source]
        source: VersionParseError,
    },

    #[error("Task '{task}' is not defined in {}", .path.display())]
    TaskNotFound { task: String, path: PathBuf },

    #[error("Failed to read task file '{}'", .path.display())]
    TaskFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvError {
    /// Process exit code for this failure. External tool codes are passed
    /// through; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            EnvError::CommandFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}

struct ExitDescription<'a>(&'a Option<i32>);

impl fmt::Display for ExitDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("a signal"),
        }
    }
}

struct OutputSuffix<'a>(&'a str);

impl fmt::Display for OutputSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            Ok(())
        } else {
            write!(f, ":\n{}", trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message_and_exit_code() {
        let err = EnvError::CommandFailed {
            command: "pipenv install".to_string(),
            code: Some(2),
            output: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Command 'pipenv install' failed with exit code 2"
        );
        assert_eq!(err.exit_code(), 2);

        let signalled = EnvError::CommandFailed {
            command: "inv init".to_string(),
            code: None,
            output: "boom\n".to_string(),
        };
        assert_eq!(
            signalled.to_string(),
            "Command 'inv init' failed with a signal:\nboom"
        );
        assert_eq!(signalled.exit_code(), 1);
    }

    #[test]
    fn test_not_found_message() {
        let err = EnvError::ProgramNotFound {
            program: "pipenv".to_string(),
            command: "pipenv install".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Program 'pipenv' not found, command: pipenv install"
        );
        assert_eq!(err.exit_code(), 1);
    }
}
