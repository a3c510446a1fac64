//! Locate the Python interpreter and read its version.

use std::path::Path;

use devinit_core::PythonVersion;

use crate::error::EnvError;
use crate::runner::{run_checked, CommandRunner, CommandSpec};

/// Candidates tried in order when no interpreter is configured.
pub const DEFAULT_CANDIDATES: &[&str] = &["python3", "python"];

/// An interpreter program and the version it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub version: PythonVersion,
}

/// Pick the interpreter program: the configured one as-is, otherwise the
/// first default candidate found on `PATH`.
pub fn resolve_program(configured: Option<&str>) -> Result<String, EnvError> {
    if let Some(p) = configured {
        return Ok(p.to_string());
    }
    DEFAULT_CANDIDATES
        .iter()
        .find(|name| which::which(name).is_ok())
        .map(|name| name.to_string())
        .ok_or_else(|| EnvError::InterpreterNotFound {
            tried: DEFAULT_CANDIDATES.join(", "),
        })
}

/// Run `<program> --version` and parse the result. Python 2 reports on
/// stderr, so both streams are scanned.
pub fn probe(runner: &dyn CommandRunner, program: &str, cwd: &Path) -> Result<Interpreter, EnvError> {
    let spec = CommandSpec::new(program, cwd, "probe").arg("--version").capture();
    let out = run_checked(runner, &spec)?;
    let version = PythonVersion::from_interpreter_output(&out.combined()).map_err(|source| {
        EnvError::UnknownVersion {
            program: program.to_string(),
            source,
        }
    })?;
    tracing::debug!(program, %version, "interpreter probed");
    Ok(Interpreter {
        program: program.to_string(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;

    struct Canned(Option<i32>, &'static str, &'static str);

    impl CommandRunner for Canned {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, EnvError> {
            assert_eq!(spec.args, vec!["--version".to_string()]);
            Ok(CommandOutput {
                command: spec.command_line(),
                code: self.0,
                stdout: self.1.to_string(),
                stderr: self.2.to_string(),
            })
        }
    }

    #[test]
    fn test_probe_reads_stdout_or_stderr() {
        let py3 = probe(&Canned(Some(0), "Python 3.8.10\n", ""), "python3", Path::new(".")).unwrap();
        assert_eq!(py3.version, "3.8.10".parse::<PythonVersion>().unwrap());
        assert_eq!(py3.program, "python3");

        let py2 = probe(&Canned(Some(0), "", "Python 2.7.18\n"), "python2", Path::new(".")).unwrap();
        assert_eq!(py2.version, "2.7.18".parse::<PythonVersion>().unwrap());
    }

    #[test]
    fn test_probe_errors() {
        assert!(matches!(
            probe(&Canned(Some(0), "not python", ""), "python3", Path::new(".")),
            Err(EnvError::UnknownVersion { .. })
        ));
        assert!(matches!(
            probe(&Canned(Some(1), "", "broken"), "python3", Path::new(".")),
            Err(EnvError::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_configured_program_is_used_verbatim() {
        assert_eq!(
            resolve_program(Some("/opt/py/bin/python3.11")).unwrap(),
            "/opt/py/bin/python3.11"
        );
    }
}
