//! devinit core: configuration, interpreter versions, the version policy hook
//! and observability. Shared by the environment, scaffolding and CLI crates.

pub mod config;
pub mod error;
pub mod observability;
pub mod policy;
pub mod version;

pub use error::{ConfigError, VersionParseError};
pub use policy::{check_python_version, PolicyHook, PolicyViolation, VersionCheck, VersionPolicy};
pub use version::PythonVersion;
