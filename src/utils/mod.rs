//! Utility modules shared by the registry and its tooling

pub mod env;
pub mod logging;

pub use env::{env_bool, env_list, env_opt};
pub use logging::{init_logging, init_logging_from_config};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
