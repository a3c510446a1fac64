//! Interpreter version tuples.
//!
//! A [`PythonVersion`] is an ordered list of integer components. Ordering is
//! lexicographic with tuple semantics, so `3.8 < 3.8.0 < 3.8.1 < 3.10`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::VersionParseError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "String")]
pub struct PythonVersion(Vec<u32>);

/// YAML accepts `"3.4"`, `[3, 4]` or a bare major such as `3`. Bare floats
/// are rejected because `3.10` would read as `3.1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Text(String),
    Parts(Vec<u32>),
    Major(u32),
}

impl TryFrom<VersionRepr> for PythonVersion {
    type Error = VersionParseError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Text(s) => s.parse(),
            VersionRepr::Parts(parts) => Self::new(parts),
            VersionRepr::Major(major) => Self::new(vec![major]),
        }
    }
}

impl From<PythonVersion> for String {
    fn from(v: PythonVersion) -> Self {
        v.to_string()
    }
}

impl PythonVersion {
    pub fn new(parts: Vec<u32>) -> Result<Self, VersionParseError> {
        if parts.is_empty() {
            return Err(VersionParseError::new("", "version has no components"));
        }
        Ok(Self(parts))
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    /// True when every component of `prefix` matches, so `3.9.7` starts with `3.9`.
    pub fn starts_with(&self, prefix: &PythonVersion) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Extract the version from `python --version` output, e.g. `Python 3.8.10`
    /// or `Python 3.12.0rc1`. Pre-release suffixes are dropped.
    pub fn from_interpreter_output(output: &str) -> Result<Self, VersionParseError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"(?i)python\s+(\d+(?:\.\d+){0,2})").expect("static regex is valid")
        });
        let caps = re
            .captures(output)
            .ok_or_else(|| VersionParseError::new(output.trim(), "no 'Python X.Y' marker"))?;
        caps[1].parse()
    }
}

impl FromStr for PythonVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::new(s, "empty"));
        }
        let parts = trimmed
            .split('.')
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|_| VersionParseError::new(s, format!("'{}' is not a number", p)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parts)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&s.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PythonVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_ordering_is_tuple_like() {
        assert!(v("2.7") < v("3.4"));
        assert!(v("3.8") < v("3.8.0"));
        assert!(v("3.8.1") < v("3.10"));
        assert!(v("3.10") > v("3.9.18"));
        assert_eq!(v("3.8.10"), PythonVersion::new(vec![3, 8, 10]).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<PythonVersion>().is_err());
        assert!("3.x".parse::<PythonVersion>().is_err());
        assert!("3..8".parse::<PythonVersion>().is_err());
        assert!(PythonVersion::new(vec![]).is_err());
    }

    #[test]
    fn test_from_interpreter_output() {
        assert_eq!(
            PythonVersion::from_interpreter_output("Python 3.8.10\n").unwrap(),
            v("3.8.10")
        );
        assert_eq!(
            PythonVersion::from_interpreter_output("Python 3.12.0rc1").unwrap(),
            v("3.12.0")
        );
        // Python 2 prints to stderr; callers join both streams
        assert_eq!(
            PythonVersion::from_interpreter_output("\nPython 2.7.18").unwrap(),
            v("2.7.18")
        );
        assert!(PythonVersion::from_interpreter_output("command not found").is_err());
    }

    #[test]
    fn test_prefix_match() {
        assert!(v("3.9.7").starts_with(&v("3.9")));
        assert!(!v("3.10.1").starts_with(&v("3.1")));
        assert_eq!(v("3.9.7").parts(), &[3, 9, 7]);
    }

    #[test]
    fn test_deserialize_forms() {
        let parsed: Vec<PythonVersion> =
            serde_yaml::from_str("[\"3.4\", [3, 6, 1], \"3.10\"]").unwrap();
        assert_eq!(parsed, vec![v("3.4"), v("3.6.1"), v("3.10")]);
        assert!(serde_yaml::from_str::<PythonVersion>("\"three\"").is_err());
        assert!(serde_yaml::from_str::<PythonVersion>("3.10").is_err());
        assert_eq!(serde_yaml::from_str::<PythonVersion>("3").unwrap(), v("3"));
    }
}
