//! External tool plumbing for devinit.
//!
//! - `runner`: [`CommandRunner`] seam and the blocking [`SystemRunner`]
//! - `interpreter`: find Python and read its version
//! - `manager`: [`EnvironmentManager`] and the pipenv implementation
//! - `tasks`: task-file inspection and invoke task execution

pub mod error;
pub mod interpreter;
pub mod manager;
pub mod runner;
pub mod tasks;

pub use error::EnvError;
pub use interpreter::Interpreter;
pub use manager::{EnvironmentManager, Pipenv};
pub use runner::{run_checked, CommandOutput, CommandRunner, CommandSpec, OutputMode, SystemRunner};
pub use tasks::{defines_task, TaskInvoker};
