//! Module metadata registry
//!
//! Modules declare themselves here (name, class, optional license flag) when
//! their code is imported. The registry never writes to it directly; it only
//! reads entries back in registration order.

use std::any::type_name;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::module::traits::{LicenseFlag, Module, ModuleName};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a module class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

type ModuleFactory = Arc<dyn Fn() -> Arc<dyn Module> + Send + Sync>;

/// Reference to a module class: an identity plus a constructor
///
/// Cloning keeps the identity, so every clone resolves to the same singleton
/// in the [`ModuleContainer`](super::container::ModuleContainer).
#[derive(Clone)]
pub struct ModuleClass {
    id: ClassId,
    type_name: &'static str,
    factory: ModuleFactory,
}

impl ModuleClass {
    /// Create a class whose instances are built by `factory`
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Module + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
            type_name: type_name::<T>(),
            factory: Arc::new(move || Arc::new(factory()) as Arc<dyn Module>),
        }
    }

    /// Create a class built with `T::default()`
    pub fn of<T>() -> Self
    where
        T: Module + Default + 'static,
    {
        Self::new(T::default)
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn construct(&self) -> Arc<dyn Module> {
        (self.factory)()
    }
}

impl fmt::Debug for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleClass")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ModuleClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModuleClass {}

/// What a module declares about itself
#[derive(Debug, Clone)]
pub struct ModuleDeclaration {
    pub name: ModuleName,
    pub class: ModuleClass,
    pub license_flag: Option<LicenseFlag>,
}

impl ModuleDeclaration {
    pub fn new(name: ModuleName, class: ModuleClass) -> Self {
        Self {
            name,
            class,
            license_flag: None,
        }
    }

    /// Gate initialization behind a license flag
    pub fn licensed(mut self, flag: LicenseFlag) -> Self {
        self.license_flag = Some(flag);
        self
    }
}

/// Registered metadata for one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMetadataEntry {
    pub class: ModuleClass,
    pub license_flag: Option<LicenseFlag>,
}

/// Ordered registry of module declarations, keyed by name
#[derive(Debug, Default)]
pub struct ModuleMetadataRegistry {
    entries: RwLock<Vec<(ModuleName, ModuleMetadataEntry)>>,
}

impl ModuleMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module
    ///
    /// Registering a name again replaces its entry in place, keeping the
    /// original position.
    pub fn register(
        &self,
        name: ModuleName,
        class: ModuleClass,
        license_flag: Option<LicenseFlag>,
    ) {
        let entry = ModuleMetadataEntry {
            class,
            license_flag,
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = entries.iter_mut().find(|(n, _)| *n == name) {
            debug!(module = %name, "Replacing module metadata entry");
            slot.1 = entry;
        } else {
            debug!(module = %name, class = entry.class.type_name(), "Registering module metadata");
            entries.push((name, entry));
        }
    }

    /// Register a module from its declaration
    pub fn declare(&self, declaration: &ModuleDeclaration) {
        self.register(
            declaration.name.clone(),
            declaration.class.clone(),
            declaration.license_flag.clone(),
        );
    }

    /// All registered classes, de-duplicated, in registration order
    pub fn classes(&self) -> Vec<ModuleClass> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut classes: Vec<ModuleClass> = Vec::with_capacity(entries.len());
        for (_, entry) in entries.iter() {
            if !classes.contains(&entry.class) {
                classes.push(entry.class.clone());
            }
        }
        classes
    }

    /// All `(name, entry)` pairs in registration order
    pub fn entries(&self) -> Vec<(ModuleName, ModuleMetadataEntry)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, name: &ModuleName) -> Option<ModuleMetadataEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry.clone())
    }

    pub fn contains(&self, name: &ModuleName) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
