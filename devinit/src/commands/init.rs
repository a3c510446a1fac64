//! `devinit`: initialize a project's development environment.
//!
//! Flow (strictly sequential, first failure aborts):
//!   1. Load the version policy hook from the project's policy file
//!   2. Probe the interpreter and apply the hook
//!   3. Bootstrap the pipenv environment and install the task runner
//!   4. Scaffold task-runner config and task definitions
//!   5. Run the `init` task inside the environment

use std::path::{Path, PathBuf};

use devinit_core::config::BootstrapConfig;
use devinit_core::{check_python_version, PolicyHook};
use devinit_env::interpreter::{self, Interpreter};
use devinit_env::{CommandRunner, EnvironmentManager, Pipenv, TaskInvoker};
use devinit_fs::templates::{self, TASKS_FILE};
use devinit_fs::EnsureOutcome;

use crate::error::InitError;

/// Inputs for one initialization run.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Absolute project directory; every command runs here.
    pub project_dir: PathBuf,
    pub bootstrap: BootstrapConfig,
    /// Trailing command for [`run_command`].
    pub command: Vec<String>,
}

/// What a successful run did.
#[derive(Debug)]
pub struct InitReport {
    pub interpreter: Interpreter,
    pub files: Vec<(PathBuf, EnsureOutcome)>,
}

fn report_file(path: &Path, outcome: EnsureOutcome) {
    match outcome {
        EnsureOutcome::Created => {
            eprintln!("   File '{}' does not exist, creating it", path.display())
        }
        EnsureOutcome::Existing => tracing::debug!(path = %path.display(), "kept existing file"),
    }
}

/// Run the full initialization pipeline.
pub fn cmd_init(opts: &InitOptions, runner: &dyn CommandRunner) -> Result<InitReport, InitError> {
    let project_dir = opts.project_dir.as_path();
    let cfg = &opts.bootstrap;

    eprintln!("🚀 Initializing {} ...", project_dir.display());

    // Step 1: settings and policy hook
    cfg.validate()?;
    let config_path = project_dir.join(&cfg.config_file);
    let hook = PolicyHook::load(&config_path)?;
    if hook.is_default() {
        eprintln!("✅ Step 1/5: No version policy, every interpreter accepted");
    } else {
        eprintln!("✅ Step 1/5: Loaded version policy from {}", config_path.display());
    }

    // Step 2: interpreter check
    let program = interpreter::resolve_program(cfg.python.as_deref())?;
    let interp = interpreter::probe(runner, &program, project_dir)?;
    tracing::info!(program = %interp.program, version = %interp.version, "checking interpreter");
    check_python_version(&hook, &interp.version)?;
    eprintln!("✅ Step 2/5: Python {} ({}) OK", interp.version, interp.program);

    // Step 3: environment
    eprintln!("📦 Step 3/5: Bootstrapping environment with {} ...", cfg.pipenv);
    let mut files = Vec::new();
    let pipfile = templates::pipfile();
    let pipfile_path = project_dir.join(&pipfile.path);
    let outcome = devinit_fs::ensure_file(&pipfile_path, &pipfile.body)?;
    report_file(&pipfile_path, outcome);
    files.push((pipfile_path, outcome));

    let pipenv = Pipenv::new(runner, cfg, project_dir);
    pipenv.ensure_environment(&interp.program)?;
    pipenv.install(&cfg.task_runner_package)?;
    eprintln!("✅ Step 3/5: Environment ready ({} installed)", cfg.task_runner_package);

    // Step 4: scaffolding
    let scaffolded = devinit_fs::scaffold(project_dir, &templates::task_templates(&cfg.init_task))?;
    for (path, outcome) in &scaffolded {
        report_file(path, *outcome);
    }
    files.extend(scaffolded);
    eprintln!("✅ Step 4/5: Task files in place");

    // Step 5: init task
    eprintln!("▶️  Step 5/5: Running task '{}' ...", cfg.init_task);
    let invoker = TaskInvoker::new(&pipenv, &cfg.task_runner, &project_dir.join(TASKS_FILE));
    invoker.invoke(&cfg.init_task)?;
    eprintln!("🎉 Project initialized with {}", pipenv.name());

    Ok(InitReport {
        interpreter: interp,
        files,
    })
}

/// Run the trailing command inside the environment and return its exit
/// code. A non-zero exit is not an error here; the caller exits with it.
pub fn run_command(opts: &InitOptions, runner: &dyn CommandRunner) -> Result<Option<i32>, InitError> {
    let pipenv = Pipenv::new(runner, &opts.bootstrap, &opts.project_dir);
    let out = pipenv.run_in_env(&opts.command, "command")?;
    Ok(out.code)
}
