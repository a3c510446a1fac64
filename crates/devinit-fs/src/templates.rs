//! Default bodies for scaffolded files.

use std::path::PathBuf;

/// A file to create under the project directory when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Path relative to the project directory.
    pub path: PathBuf,
    pub body: String,
}

impl Template {
    pub fn new(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }
}

pub const PIPFILE: &str = "Pipfile";
pub const INVOKE_CONFIG: &str = "invoke.py";
pub const TASKS_FILE: &str = "tasks.py";

/// Environment-manager manifest with the public package index as source.
pub const PIPFILE_BODY: &str = r#"[[source]]
url = "https://pypi.org/simple"
verify_ssl = true
name = "pypi"
"#;

/// Task-runner settings: echo commands and run them under a pty.
pub const INVOKE_CONFIG_BODY: &str = "debug = True
run = {
    'echo': True,
    'pty': True,
}
";

/// Task definitions with a single placeholder task named `task_name`. invoke
/// maps underscores in function names to dashes, so `init-db` is defined as
/// `def init_db`.
pub fn tasks_py(task_name: &str) -> String {
    format!(
        "from invoke import task


@task
def {name}(ctx):
    ctx.run('echo tasks.py says hi')
",
        name = task_name.replace('-', "_")
    )
}

pub fn pipfile() -> Template {
    Template::new(PIPFILE, PIPFILE_BODY)
}

/// Task-runner configuration and task definitions, in creation order.
pub fn task_templates(task_name: &str) -> Vec<Template> {
    vec![
        Template::new(INVOKE_CONFIG, INVOKE_CONFIG_BODY),
        Template::new(TASKS_FILE, tasks_py(task_name)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_py_defines_requested_task() {
        let body = tasks_py("setup");
        assert!(body.contains("@task\ndef setup(ctx):"));
        assert!(body.contains("tasks.py says hi"));

        assert!(tasks_py("init-db").contains("@task\ndef init_db(ctx):"));
    }

    #[test]
    fn test_task_templates_order() {
        let names: Vec<_> = task_templates("init")
            .into_iter()
            .map(|t| t.path)
            .collect();
        assert_eq!(names, vec![PathBuf::from(INVOKE_CONFIG), PathBuf::from(TASKS_FILE)]);
    }
}
