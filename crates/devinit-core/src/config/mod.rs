//! devinit configuration layer
//!
//! Every environment read goes through here; the rest of the workspace uses
//! the typed structs.
//!
//! - `loader`: env_or, env_optional, env_bool, `.env` loading
//! - `schema`: BootstrapConfig, ObservabilityConfig
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{
    env_bool, env_optional, env_or, load_dotenv_from_dir, remove_env_var,
    set_env_var, ScopedEnvGuard,
};
pub use schema::{BootstrapConfig, ObservabilityConfig, DEFAULT_CONFIG_FILE};
