//! Environment variable loading helpers.
//!
//! Keeps the fallback chain in one place so business code never repeats
//! `or_else` ladders over `std::env::var`.

use std::env;
use std::path::Path;

/// Parse `.env` content into key/value pairs. Blank lines and `#` comments are
/// skipped, surrounding quotes are stripped, and an unquoted inline `#` starts
/// a comment.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Load `<dir>/.env` into the process environment without overriding
/// variables that are already set. Runs at most once per process; returns the
/// number of variables set by that first call.
///
/// Must be called before any threads are spawned.
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    use std::sync::OnceLock;
    static LOADED: OnceLock<usize> = OnceLock::new();
    *LOADED.get_or_init(|| {
        let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
            return 0;
        };
        let mut loaded = 0usize;
        for (key, value) in parse_dotenv(&content) {
            if env::var(&key).is_err() {
                set_env_var(&key, &value);
                loaded += 1;
            }
        }
        loaded
    })
}

/// Read the primary variable or the first set alias, falling back to `default`.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(primary, aliases).unwrap_or_else(default)
}

/// Read the primary variable or the first set alias. Empty values count as unset.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Parse a boolean variable: 0/false/no/off are false, anything else is true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

// All env::set_var / remove_var calls go through these two functions.
// Callers must invoke them before spawning threads.

#[allow(unsafe_code, unused_unsafe)]
pub fn set_env_var(key: &str, value: &str) {
    unsafe { env::set_var(key, value) };
}

#[allow(unsafe_code, unused_unsafe)]
pub fn remove_env_var(key: &str) {
    unsafe { env::remove_var(key) };
}

/// RAII guard: removes the variable on drop.
pub struct ScopedEnvGuard(pub &'static str);

impl Drop for ScopedEnvGuard {
    fn drop(&mut self) {
        remove_env_var(self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = r#"
# comment
DEVINIT_PIPENV=/opt/pipenv
export DEVINIT_PYTHON="python3.11"
DEVINIT_TASK_RUNNER='inv'   # trailing comment
NO_EQUALS_LINE
DEVINIT_CONFIG=cfg.yaml # note
"#;
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("DEVINIT_PIPENV".to_string(), "/opt/pipenv".to_string()),
                ("DEVINIT_PYTHON".to_string(), "python3.11".to_string()),
                ("DEVINIT_TASK_RUNNER".to_string(), "inv".to_string()),
                ("DEVINIT_CONFIG".to_string(), "cfg.yaml".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_optional_alias_and_empty() {
        let _g1 = ScopedEnvGuard("DEVINIT_TEST_LOADER_PRIMARY");
        let _g2 = ScopedEnvGuard("DEVINIT_TEST_LOADER_ALIAS");
        set_env_var("DEVINIT_TEST_LOADER_PRIMARY", "  ");
        assert_eq!(env_optional("DEVINIT_TEST_LOADER_PRIMARY", &[]), None);

        remove_env_var("DEVINIT_TEST_LOADER_PRIMARY");
        set_env_var("DEVINIT_TEST_LOADER_ALIAS", "from-alias");
        assert_eq!(
            env_optional("DEVINIT_TEST_LOADER_PRIMARY", &["DEVINIT_TEST_LOADER_ALIAS"]),
            Some("from-alias".to_string())
        );
        assert_eq!(
            env_or("DEVINIT_TEST_LOADER_MISSING", &[], || "fallback".to_string()),
            "fallback"
        );
    }

    #[test]
    fn test_env_bool() {
        let _g = ScopedEnvGuard("DEVINIT_TEST_LOADER_BOOL");
        assert!(env_bool("DEVINIT_TEST_LOADER_BOOL", &[], true));
        set_env_var("DEVINIT_TEST_LOADER_BOOL", "off");
        assert!(!env_bool("DEVINIT_TEST_LOADER_BOOL", &[], true));
        set_env_var("DEVINIT_TEST_LOADER_BOOL", "1");
        assert!(env_bool("DEVINIT_TEST_LOADER_BOOL", &[], false));
    }

    #[test]
    fn test_load_dotenv_once_and_count() {
        let _ga = ScopedEnvGuard("DEVINIT_TEST_DOTENV_NEW");
        let _gb = ScopedEnvGuard("DEVINIT_TEST_DOTENV_SET");
        let _gc = ScopedEnvGuard("DEVINIT_TEST_DOTENV_LATER");
        set_env_var("DEVINIT_TEST_DOTENV_SET", "from-shell");

        let first = tempfile::TempDir::new().unwrap();
        std::fs::write(
            first.path().join(".env"),
            "DEVINIT_TEST_DOTENV_NEW=loaded\nDEVINIT_TEST_DOTENV_SET=from-file\n",
        )
        .unwrap();
        assert_eq!(load_dotenv_from_dir(first.path()), 1);
        assert_eq!(env::var("DEVINIT_TEST_DOTENV_NEW").unwrap(), "loaded");
        assert_eq!(env::var("DEVINIT_TEST_DOTENV_SET").unwrap(), "from-shell");

        let second = tempfile::TempDir::new().unwrap();
        std::fs::write(second.path().join(".env"), "DEVINIT_TEST_DOTENV_LATER=x\n").unwrap();
        assert_eq!(load_dotenv_from_dir(second.path()), 1);
        assert!(env::var("DEVINIT_TEST_DOTENV_LATER").is_err());
    }
}
