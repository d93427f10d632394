//! Registry error taxonomy
//!
//! Every variant is fatal for the operation that raised it. The registry
//! never retries; the host decides whether startup continues.

use std::path::PathBuf;
use thiserror::Error;

use crate::module::traits::{ModuleError, ModuleName};

/// Failure to import one candidate module entry
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no module registered at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("module at {} failed to register: {reason}", .path.display())]
    Registration { path: PathBuf, reason: String },
}

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Same module listed as both enabled and disabled
    #[error("Modules are both enabled and disabled: {}", join_names(.modules))]
    ModuleConfusion { modules: Vec<ModuleName> },

    /// Neither the standard nor the enterprise entry could be imported
    #[error("Failed to load module \"{name}\": {source}")]
    MissingModule {
        name: ModuleName,
        #[source]
        source: ImportError,
    },

    /// A loaded module failed to report its entities or load directory
    #[error(
        "Failed to query contributions of module {} ({class}): {source}",
        join_names(.modules)
    )]
    Contribution {
        class: &'static str,
        modules: Vec<ModuleName>,
        #[source]
        source: ModuleError,
    },

    #[error("Module \"{name}\" failed to initialize: {source}")]
    Init {
        name: ModuleName,
        #[source]
        source: ModuleError,
    },

    #[error("Module \"{name}\" failed to report settings: {source}")]
    Settings {
        name: ModuleName,
        #[source]
        source: ModuleError,
    },

    #[error("Module \"{name}\" failed to shut down: {source}")]
    Shutdown {
        name: ModuleName,
        #[source]
        source: ModuleError,
    },
}

fn join_names(names: &[ModuleName]) -> String {
    names
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
