//! Module eligibility
//!
//! Decides which module names are considered for loading this run, from the
//! built-in defaults and the configured enabled/disabled lists.

use tracing::{debug, error};

use crate::module::error::RegistryError;
use crate::module::traits::ModuleName;

/// Modules eligible unless explicitly disabled
pub const DEFAULT_MODULES: [ModuleName; 2] = [ModuleName::INSIGHTS, ModuleName::EXTERNAL_SECRETS];

/// Resolve the ordered, de-duplicated set of eligible modules
///
/// Defaults come first, then enabled modules not already present; anything
/// disabled is removed. A name that is both enabled and disabled is a
/// configuration error naming every such module.
pub fn eligible_modules(
    defaults: &[ModuleName],
    enabled: &[ModuleName],
    disabled: &[ModuleName],
) -> Result<Vec<ModuleName>, RegistryError> {
    let double_listed = dedup(enabled.iter().filter(|name| disabled.contains(name)));
    if !double_listed.is_empty() {
        error!(modules = ?double_listed, "Modules are both enabled and disabled");
        return Err(RegistryError::ModuleConfusion {
            modules: double_listed,
        });
    }

    let eligible: Vec<ModuleName> = dedup(defaults.iter().chain(enabled))
        .into_iter()
        .filter(|name| !disabled.contains(name))
        .collect();

    debug!(modules = ?eligible, "Resolved eligible modules");
    Ok(eligible)
}

fn dedup<'a>(names: impl Iterator<Item = &'a ModuleName>) -> Vec<ModuleName> {
    let mut unique: Vec<ModuleName> = Vec::new();
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }
    unique
}
