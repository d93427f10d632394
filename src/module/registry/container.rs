//! Module instance container
//!
//! Turns a [`ModuleClass`] into its process-wide singleton instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::module::registry::metadata::{ClassId, ModuleClass};
use crate::module::traits::Module;

/// Singleton instances keyed by class identity
#[derive(Default)]
pub struct ModuleContainer {
    instances: Mutex<HashMap<ClassId, Arc<dyn Module>>>,
}

impl ModuleContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the singleton for `class`, constructing it on first use
    pub fn get(&self, class: &ModuleClass) -> Arc<dyn Module> {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(instances.entry(class.id()).or_insert_with(|| {
            debug!(class = class.type_name(), "Constructing module instance");
            class.construct()
        }))
    }

    /// Number of instances constructed so far
    pub(crate) fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for ModuleContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContainer")
            .field("instances", &self.len())
            .finish()
    }
}
