//! Observability: tracing init and the command audit log.
//!
//! Reads DEVINIT_QUIET, DEVINIT_LOG_LEVEL, DEVINIT_LOG_JSON and
//! DEVINIT_AUDIT_LOG through [`crate::config::ObservabilityConfig`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

static AUDIT_PATH: Mutex<Option<String>> = Mutex::new(None);

/// Initialize tracing. Call once at process startup.
/// With DEVINIT_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "devinit=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}

fn get_audit_path() -> Option<String> {
    {
        let guard = AUDIT_PATH.lock().ok()?;
        if let Some(ref p) = *guard {
            return Some(p.clone());
        }
    }
    let path = crate::config::ObservabilityConfig::from_env()
        .audit_log
        .clone()?;
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    {
        let mut guard = AUDIT_PATH.lock().ok()?;
        *guard = Some(path.clone());
    }
    Some(path)
}

fn append_jsonl(path: &str, record: &serde_json::Value) {
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

fn command_started_record(step: &str, program: &str, args: &[String], cwd: &str) -> serde_json::Value {
    json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "event": "command_started",
        "step": step,
        "cmd": program,
        "args": args,
        "cwd": cwd,
    })
}

fn command_completed_record(step: &str, exit_code: Option<i32>, duration_ms: u64) -> serde_json::Value {
    let success = exit_code == Some(0);
    json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "event": "command_completed",
        "step": step,
        "exit_code": exit_code,
        "duration_ms": duration_ms,
        "success": success,
    })
}

/// Audit: an external command is about to be spawned.
pub fn audit_command_started(step: &str, program: &str, args: &[String], cwd: &str) {
    if let Some(path) = get_audit_path() {
        append_jsonl(&path, &command_started_record(step, program, args, cwd));
    }
}

/// Audit: an external command exited. `exit_code` is `None` when it was
/// killed by a signal.
pub fn audit_command_completed(step: &str, exit_code: Option<i32>, duration_ms: u64) {
    if let Some(path) = get_audit_path() {
        append_jsonl(&path, &command_completed_record(step, exit_code, duration_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_records_shape() {
        let started = command_started_record(
            "bootstrap",
            "pipenv",
            &["install".to_string()],
            "/tmp/project",
        );
        assert_eq!(started["event"], "command_started");
        assert_eq!(started["args"][0], "install");

        let done = command_completed_record("bootstrap", Some(2), 15);
        assert_eq!(done["success"], false);
        assert_eq!(done["exit_code"], 2);

        let killed = command_completed_record("init-task", None, 3);
        assert!(killed["exit_code"].is_null());
    }

    #[test]
    fn test_append_jsonl_appends_lines() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("audit.jsonl");
        let p = path.to_string_lossy().to_string();
        append_jsonl(&p, &command_completed_record("a", Some(0), 1));
        append_jsonl(&p, &command_completed_record("b", Some(0), 1));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
