//! Built-in modules
//!
//! The default modules ship linked into the crate. `insights` lives at its
//! standard entry; `external-secrets` only exists as an enterprise entry.

pub mod external_secrets;
pub mod insights;

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::module::license::StaticLicense;
use crate::module::loader::{ModuleLoader, StaticModuleCatalog};
use crate::module::manager::ModuleRegistry;
use crate::module::registry::locator::{ModuleLocator, SystemProbe};

pub use external_secrets::{ExternalSecretsModule, EXTERNAL_SECRETS_LICENSE};
pub use insights::InsightsModule;

/// Catalog of every built-in module
pub fn catalog() -> StaticModuleCatalog {
    StaticModuleCatalog::new()
        .standard(InsightsModule::declaration())
        .enterprise(ExternalSecretsModule::declaration())
}

/// Build a registry over the built-in catalog from configuration
///
/// The modules base directory comes from the locator, using the configured
/// package root when one is set.
pub fn registry_from_config(config: &RegistryConfig) -> ModuleRegistry {
    let probe = SystemProbe::with_package_root(config.locator.package_root.clone());
    let base_dir = ModuleLocator::new(probe).base_dir();
    ModuleRegistry::new(
        Arc::new(config.modules.clone()),
        Arc::new(StaticLicense::new(config.license.features.iter().cloned())),
        ModuleLoader::new(base_dir, Arc::new(catalog())),
    )
}
