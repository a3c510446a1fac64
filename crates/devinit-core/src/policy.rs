//! Interpreter version policy.
//!
//! The project-local policy file exposes one hook, `check_python_version`.
//! Loading produces a [`PolicyHook`]: either the configured policy or the
//! permissive default used when the file (or the key) is absent. The hook is
//! handed to [`check_python_version`] explicitly; nothing is cached globally.
//!
//! ```yaml
//! check_python_version:
//!   minimum: "3.4"
//!   below: "4.0"
//!   exclude: ["3.5"]
//!   message: "Install a newer interpreter with pyenv"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ConfigError;
use crate::version::PythonVersion;

/// Hook key recognized in the policy file.
pub const HOOK_KEY: &str = "check_python_version";

/// Bounds a project places on the interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionPolicy {
    /// Inclusive lower bound.
    #[serde(default)]
    pub minimum: Option<PythonVersion>,
    /// Exclusive upper bound.
    #[serde(default)]
    pub below: Option<PythonVersion>,
    /// Prefixes to reject; `3.5` rejects every 3.5.x.
    #[serde(default)]
    pub exclude: Vec<PythonVersion>,
    /// Extra text appended to violation messages.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    check_python_version: Option<VersionPolicy>,
}

/// The version-check capability, either configured or defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyHook {
    Configured { path: PathBuf, policy: VersionPolicy },
    /// No file or no hook key: every version passes.
    Default,
}

/// A rejected interpreter version.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct PolicyViolation {
    pub version: PythonVersion,
    /// Human-readable bound that failed, e.g. `>= 3.4`.
    pub requirement: String,
    pub config_path: Option<PathBuf>,
    pub note: Option<String>,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Python {} is not supported: requires {}",
            self.version, self.requirement
        )?;
        if let Some(ref path) = self.config_path {
            write!(f, " (see {})", path.display())?;
        }
        if let Some(ref note) = self.note {
            write!(f, ". {}", note)?;
        }
        Ok(())
    }
}

/// Predicate over interpreter versions. Implemented by [`PolicyHook`] and by
/// plain closures.
pub trait VersionCheck {
    fn check(&self, version: &PythonVersion) -> Result<(), PolicyViolation>;
}

impl<F> VersionCheck for F
where
    F: Fn(&PythonVersion) -> Result<(), PolicyViolation>,
{
    fn check(&self, version: &PythonVersion) -> Result<(), PolicyViolation> {
        self(version)
    }
}

impl VersionPolicy {
    fn violation(&self, version: &PythonVersion, requirement: String, path: &Path) -> PolicyViolation {
        PolicyViolation {
            version: version.clone(),
            requirement,
            config_path: Some(path.to_path_buf()),
            note: self.message.clone(),
        }
    }

    /// Apply the bounds in order: minimum, upper bound, exclusions.
    pub fn evaluate(&self, version: &PythonVersion, path: &Path) -> Result<(), PolicyViolation> {
        if let Some(ref min) = self.minimum {
            if version < min {
                return Err(self.violation(version, format!(">= {}", min), path));
            }
        }
        if let Some(ref below) = self.below {
            if version >= below {
                return Err(self.violation(version, format!("< {}", below), path));
            }
        }
        if let Some(excluded) = self.exclude.iter().find(|x| version.starts_with(x)) {
            return Err(self.violation(version, format!("not {}.*", excluded), path));
        }
        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if let (Some(min), Some(below)) = (&self.minimum, &self.below) {
            if min >= below {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    reason: format!(
                        "{}: minimum {} must be lower than below {}",
                        HOOK_KEY, min, below
                    ),
                });
            }
        }
        Ok(())
    }
}

impl VersionCheck for PolicyHook {
    fn check(&self, version: &PythonVersion) -> Result<(), PolicyViolation> {
        match self {
            PolicyHook::Configured { path, policy } => policy.evaluate(version, path),
            PolicyHook::Default => Ok(()),
        }
    }
}

impl PolicyHook {
    /// Load the hook from `path`. A missing file or a file without the hook
    /// key yields [`PolicyHook::Default`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            tracing::info!("Config '{}' not found, skip checking", path.display());
            return Ok(PolicyHook::Default);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse policy file content. `path` is only used for messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_err = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let file = if content.trim().is_empty() {
            PolicyFile::default()
        } else {
            let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_err)?;
            if value.is_null() {
                PolicyFile::default()
            } else {
                serde_yaml::from_value(value).map_err(parse_err)?
            }
        };

        match file.check_python_version {
            Some(policy) => {
                policy.validate(path)?;
                Ok(PolicyHook::Configured {
                    path: path.to_path_buf(),
                    policy,
                })
            }
            None => {
                tracing::info!(
                    "Config '{}:{}' not found, skip checking",
                    path.display(),
                    HOOK_KEY
                );
                Ok(PolicyHook::Default)
            }
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PolicyHook::Default)
    }
}

/// Apply `hook` to `version`. Pure: the outcome depends only on the arguments.
pub fn check_python_version(
    hook: &dyn VersionCheck,
    version: &PythonVersion,
) -> Result<(), PolicyViolation> {
    hook.check(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn v(s: &str) -> PythonVersion {
        s.parse().unwrap()
    }

    fn hook(yaml: &str) -> PolicyHook {
        PolicyHook::parse(yaml, Path::new("init_config.yaml")).unwrap()
    }

    #[test]
    fn test_missing_file_is_permissive() {
        let tmp = TempDir::new().unwrap();
        let hook = PolicyHook::load(&tmp.path().join("init_config.yaml")).unwrap();
        assert!(hook.is_default());
        for s in ["1.0", "2.7.18", "3.4", "3.13.1", "99"] {
            assert!(check_python_version(&hook, &v(s)).is_ok(), "{} rejected", s);
        }
    }

    #[test]
    fn test_file_without_hook_key_is_permissive() {
        assert!(hook("other_setting: 1\n").is_default());
        assert!(hook("").is_default());
    }

    #[test]
    fn test_minimum_rejects_older_and_names_requirement() {
        let h = hook("check_python_version:\n  minimum: \"3.4\"\n");
        let err = check_python_version(&h, &v("2.7")).unwrap_err();
        assert_eq!(err.requirement, ">= 3.4");
        let msg = err.to_string();
        assert!(msg.contains("Python 2.7"), "{}", msg);
        assert!(msg.contains(">= 3.4"), "{}", msg);
        assert!(msg.contains("init_config.yaml"), "{}", msg);

        assert!(check_python_version(&h, &v("3.4")).is_ok());
        assert!(check_python_version(&h, &v("3.8.10")).is_ok());
    }

    #[test]
    fn test_below_exclude_and_message() {
        let h = hook(
            "check_python_version:\n  minimum: [3, 6]\n  below: \"3.12\"\n  exclude: [\"3.9\"]\n  message: use pyenv\n",
        );
        assert!(check_python_version(&h, &v("3.8")).is_ok());
        assert!(check_python_version(&h, &v("3.10.2")).is_ok());

        let upper = check_python_version(&h, &v("3.12.0")).unwrap_err();
        assert_eq!(upper.requirement, "< 3.12");
        assert!(upper.to_string().ends_with(". use pyenv"));

        let excluded = check_python_version(&h, &v("3.9.18")).unwrap_err();
        assert_eq!(excluded.requirement, "not 3.9.*");
    }

    #[test]
    fn test_bare_major_bounds() {
        let h = hook("check_python_version:\n  minimum: 3\n  below: 4\n");
        assert!(check_python_version(&h, &v("3.0")).is_ok());
        assert!(check_python_version(&h, &v("3.13.1")).is_ok());
        assert_eq!(check_python_version(&h, &v("2.7.18")).unwrap_err().requirement, ">= 3");
        assert_eq!(check_python_version(&h, &v("4.0")).unwrap_err().requirement, "< 4");
    }

    #[test]
    fn test_checker_halts_iff_predicate_fails() {
        let policy = hook("check_python_version:\n  minimum: \"3.4\"\n  below: \"3.11\"\n");
        for major in 2..=4u32 {
            for minor in 0..=12u32 {
                let version = PythonVersion::new(vec![major, minor]).unwrap();
                let expected_ok = version >= v("3.4") && version < v("3.11");
                assert_eq!(
                    check_python_version(&policy, &version).is_ok(),
                    expected_ok,
                    "{}",
                    version
                );
            }
        }

        let reject_odd_minor = |version: &PythonVersion| {
            if version.parts().get(1).copied().unwrap_or(0) % 2 == 1 {
                Err(PolicyViolation {
                    version: version.clone(),
                    requirement: "an even minor".to_string(),
                    config_path: None,
                    note: None,
                })
            } else {
                Ok(())
            }
        };
        assert!(check_python_version(&reject_odd_minor, &v("3.8")).is_ok());
        assert!(check_python_version(&reject_odd_minor, &v("3.7")).is_err());
    }

    #[test]
    fn test_invalid_configs_are_errors() {
        let path = Path::new("init_config.yaml");
        assert!(matches!(
            PolicyHook::parse("check_python_version:\n  minimum: \"3.x\"\n", path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            PolicyHook::parse("check_python_version:\n  minimun: \"3.4\"\n", path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            PolicyHook::parse(
                "check_python_version:\n  minimum: \"3.8\"\n  below: \"3.8\"\n",
                path
            ),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PolicyHook::parse("check_python_version: [\n", path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("init_config.yaml");
        fs::write(&path, "check_python_version:\n  minimum: \"3.4\"\n").unwrap();
        match PolicyHook::load(&path).unwrap() {
            PolicyHook::Configured { path: p, policy } => {
                assert_eq!(p, path);
                assert_eq!(policy.minimum, Some(v("3.4")));
            }
            PolicyHook::Default => panic!("expected configured hook"),
        }
    }
}
