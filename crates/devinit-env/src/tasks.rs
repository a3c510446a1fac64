//! Task file inspection and task invocation.
//!
//! Before asking the task runner to execute a task, the task file is checked
//! for a definition so a missing task surfaces as [`EnvError::TaskNotFound`]
//! instead of a task-runner failure.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::EnvError;
use crate::manager::EnvironmentManager;

fn task_decorator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@(?:\w+\.)*task\b").expect("static regex is valid"))
}

fn decorator_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bname\s*=\s*['"]([\w-]+)['"]"#).expect("static regex is valid")
    })
}

fn def_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:async\s+)?def\s+(\w+)\s*\(").expect("static regex is valid"))
}

/// Net parenthesis depth change of one line. Quoted spans and trailing
/// comments do not count.
fn paren_delta(line: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '#' => break,
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            },
        }
    }
    depth
}

/// invoke exposes `init_db` as `init-db`, so names compare dash-insensitively.
fn same_task_name(a: &str, b: &str) -> bool {
    a.replace('_', "-") == b.replace('_', "-")
}

/// True when `source` defines a task called `task`: a function decorated with
/// `@task` (or `@<module>.task`) whose name is `task`, or whose `@task(...)`
/// decorator passes `name="<task>"`. Decorator arguments may span several
/// lines.
pub fn defines_task(source: &str, task: &str) -> bool {
    let mut decorated = false;
    let mut explicit_name: Option<String> = None;
    let mut open_parens = 0i32;
    // Inside the argument list of a multi-line `@task(` decorator.
    let mut in_task_args = false;

    for raw in source.lines() {
        let line = raw.trim();

        if open_parens > 0 {
            if in_task_args && explicit_name.is_none() {
                explicit_name = decorator_name_re().captures(line).map(|c| c[1].to_string());
            }
            open_parens += paren_delta(line);
            if open_parens <= 0 {
                open_parens = 0;
                in_task_args = false;
            }
            continue;
        }

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('@') {
            let is_task = task_decorator_re().is_match(line);
            if is_task {
                decorated = true;
                explicit_name = decorator_name_re().captures(line).map(|c| c[1].to_string());
            }
            open_parens = paren_delta(line).max(0);
            in_task_args = is_task && open_parens > 0;
            continue;
        }

        if let Some(caps) = def_re().captures(line) {
            let name = explicit_name.as_deref().unwrap_or(&caps[1]);
            if decorated && same_task_name(name, task) {
                return true;
            }
        }
        decorated = false;
        explicit_name = None;
    }
    false
}

/// Fail with [`EnvError::TaskNotFound`] unless `tasks_file` defines `task`.
pub fn ensure_task_defined(tasks_file: &Path, task: &str) -> Result<(), EnvError> {
    let source = match std::fs::read_to_string(tasks_file) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(EnvError::TaskFile {
                path: tasks_file.to_path_buf(),
                source,
            })
        }
    };
    if defines_task(&source, task) {
        Ok(())
    } else {
        Err(EnvError::TaskNotFound {
            task: task.to_string(),
            path: tasks_file.to_path_buf(),
        })
    }
}

/// Runs named tasks through the task runner inside the environment.
pub struct TaskInvoker<'a> {
    manager: &'a dyn EnvironmentManager,
    runner_program: String,
    tasks_file: PathBuf,
}

impl<'a> TaskInvoker<'a> {
    pub fn new(manager: &'a dyn EnvironmentManager, runner_program: &str, tasks_file: &Path) -> Self {
        Self {
            manager,
            runner_program: runner_program.to_string(),
            tasks_file: tasks_file.to_path_buf(),
        }
    }

    /// Check the task exists, then run it synchronously with output streamed.
    pub fn invoke(&self, task: &str) -> Result<(), EnvError> {
        ensure_task_defined(&self.tasks_file, task)?;
        let argv = [self.runner_program.clone(), task.to_string()];
        self.manager.run_in_env(&argv, "init-task")?.into_checked()?;
        Ok(())
    }
}
