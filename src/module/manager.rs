//! Module registry
//!
//! Owns the registry state and drives every module through
//! load → (license check) → init → shutdown.
//!
//! Loading must complete before init: a module that was never imported has no
//! metadata entry, so the init pass cannot reach it. Lifecycle calls are
//! serialized by an internal lock held for the whole call; readers get
//! snapshots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ModuleConfigSource;
use crate::module::error::RegistryError;
use crate::module::license::LicenseState;
use crate::module::loader::ModuleLoader;
use crate::module::registry::container::ModuleContainer;
use crate::module::registry::eligibility::{eligible_modules, DEFAULT_MODULES};
use crate::module::registry::metadata::{ModuleClass, ModuleMetadataRegistry};
use crate::module::traits::{Entity, ModuleError, ModuleName, ModuleSettings};

/// Everything the registry has learned about loaded modules
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    /// Entities contributed by loaded modules, in load order
    pub entities: Vec<Entity>,
    /// Static resource directories contributed by loaded modules
    pub load_dirs: Vec<PathBuf>,
    /// Last reported settings per module; kept after shutdown
    pub settings: HashMap<ModuleName, ModuleSettings>,
    /// Initialized and not yet shut down, in init order
    pub active_modules: Vec<ModuleName>,
}

/// Module registry coordinates eligibility, loading and lifecycle
pub struct ModuleRegistry {
    config: Arc<dyn ModuleConfigSource>,
    license: Arc<dyn LicenseState>,
    loader: ModuleLoader,
    metadata: Arc<ModuleMetadataRegistry>,
    container: ModuleContainer,
    default_modules: Vec<ModuleName>,
    state: RwLock<RegistryState>,
    lifecycle: Mutex<()>,
}

impl ModuleRegistry {
    /// Create a registry with an empty metadata registry
    pub fn new(
        config: Arc<dyn ModuleConfigSource>,
        license: Arc<dyn LicenseState>,
        loader: ModuleLoader,
    ) -> Self {
        Self::with_metadata(config, license, loader, Arc::new(ModuleMetadataRegistry::new()))
    }

    /// Create a registry sharing an existing metadata registry
    pub fn with_metadata(
        config: Arc<dyn ModuleConfigSource>,
        license: Arc<dyn LicenseState>,
        loader: ModuleLoader,
        metadata: Arc<ModuleMetadataRegistry>,
    ) -> Self {
        Self {
            config,
            license,
            loader,
            metadata,
            container: ModuleContainer::new(),
            default_modules: DEFAULT_MODULES.to_vec(),
            state: RwLock::new(RegistryState::default()),
            lifecycle: Mutex::new(()),
        }
    }

    /// Replace the built-in default module list
    pub fn with_default_modules(mut self, defaults: Vec<ModuleName>) -> Self {
        self.default_modules = defaults;
        self
    }

    /// Modules eligible for loading under the current configuration
    ///
    /// Re-read from the configuration source on every call.
    pub fn eligible_modules(&self) -> Result<Vec<ModuleName>, RegistryError> {
        eligible_modules(
            &self.default_modules,
            &self.config.enabled_modules(),
            &self.config.disabled_modules(),
        )
    }

    /// Load modules and collect their contributions
    ///
    /// `names` defaults to [`eligible_modules`](Self::eligible_modules). Any
    /// missing module aborts the whole call. Contributions are then queried
    /// from every registered module class, including ones loaded by earlier
    /// calls, so loading the same module twice appends its contributions twice.
    pub async fn load_modules(&self, names: Option<&[ModuleName]>) -> Result<(), RegistryError> {
        let _guard = self.lifecycle.lock().await;

        let names = match names {
            Some(names) => names.to_vec(),
            None => self.eligible_modules()?,
        };
        info!(modules = ?names, base_dir = %self.loader.base_dir().display(), "Loading modules");

        for name in &names {
            self.loader.import_module(name, &self.metadata).await?;
        }

        for class in self.metadata.classes() {
            let instance = self.container.get(&class);
            let contribution_error = |capability: &'static str, source: ModuleError| {
                let modules = self.modules_for_class(&class);
                error!(
                    class = class.type_name(),
                    modules = ?modules,
                    capability,
                    error = %source,
                    "Failed to query module contributions"
                );
                RegistryError::Contribution {
                    class: class.type_name(),
                    modules,
                    source,
                }
            };

            let entities = instance
                .entities()
                .await
                .map_err(|source| contribution_error("entities", source))?;
            if !entities.is_empty() {
                debug!(class = class.type_name(), count = entities.len(), "Registering module entities");
                self.write_state().entities.extend(entities);
            }

            let load_dir = instance
                .load_dir()
                .await
                .map_err(|source| contribution_error("load_dir", source))?;
            if let Some(dir) = load_dir {
                debug!(class = class.type_name(), dir = %dir.display(), "Registering module load directory");
                self.write_state().load_dirs.push(dir);
            }
        }

        info!(count = names.len(), "Modules loaded");
        Ok(())
    }

    /// Initialize every registered module that passes its license check
    ///
    /// Runs in registration order. An init failure aborts the pass; modules
    /// initialized before it stay active. Modules that are already active are
    /// skipped rather than initialized twice.
    pub async fn init_modules(&self) -> Result<(), RegistryError> {
        let _guard = self.lifecycle.lock().await;

        for (name, entry) in self.metadata.entries() {
            if let Some(flag) = &entry.license_flag {
                if !self.license.is_licensed(flag) {
                    info!(module = %name, license_flag = %flag, "Skipping unlicensed module");
                    continue;
                }
            }

            if self.is_active(&name) {
                warn!(module = %name, "Module is already active, skipping init");
                continue;
            }

            let instance = self.container.get(&entry.class);

            instance.init().await.map_err(|source| {
                error!(module = %name, error = %source, "Module init failed");
                RegistryError::Init {
                    name: name.clone(),
                    source,
                }
            })?;

            let settings = instance.settings().await.map_err(|source| {
                error!(module = %name, error = %source, "Module settings failed");
                RegistryError::Settings {
                    name: name.clone(),
                    source,
                }
            })?;

            {
                let mut state = self.write_state();
                if let Some(settings) = settings {
                    state.settings.insert(name.clone(), settings);
                }
                state.active_modules.push(name.clone());
            }

            info!(module = %name, "Module initialized");
        }

        Ok(())
    }

    /// Shut down one module
    ///
    /// A name without a metadata entry is skipped. The module's own shutdown
    /// runs on every call; removal from the active list is idempotent.
    pub async fn shutdown_module(&self, name: &ModuleName) -> Result<(), RegistryError> {
        let _guard = self.lifecycle.lock().await;
        self.shutdown_locked(name).await
    }

    /// Shut down every active module in reverse init order
    ///
    /// Stops at the first failure.
    pub async fn shutdown_all(&self) -> Result<(), RegistryError> {
        let _guard = self.lifecycle.lock().await;
        let active = self.active_modules();
        for name in active.iter().rev() {
            self.shutdown_locked(name).await?;
        }
        Ok(())
    }

    async fn shutdown_locked(&self, name: &ModuleName) -> Result<(), RegistryError> {
        let Some(entry) = self.metadata.get(name) else {
            debug!(module = %name, "Module is not registered, skipping shutdown");
            return Ok(());
        };

        let instance = self.container.get(&entry.class);
        instance.shutdown().await.map_err(|source| {
            error!(module = %name, error = %source, "Module shutdown failed");
            RegistryError::Shutdown {
                name: name.clone(),
                source,
            }
        })?;

        self.write_state().active_modules.retain(|active| active != name);
        info!(module = %name, "Module shut down");
        Ok(())
    }

    pub fn is_active(&self, name: &ModuleName) -> bool {
        self.read_state().active_modules.contains(name)
    }

    /// Active modules in init order
    pub fn active_modules(&self) -> Vec<ModuleName> {
        self.read_state().active_modules.clone()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.read_state().entities.clone()
    }

    pub fn load_dirs(&self) -> Vec<PathBuf> {
        self.read_state().load_dirs.clone()
    }

    pub fn settings(&self) -> HashMap<ModuleName, ModuleSettings> {
        self.read_state().settings.clone()
    }

    pub fn settings_for(&self, name: &ModuleName) -> Option<ModuleSettings> {
        self.read_state().settings.get(name).cloned()
    }

    /// Snapshot of the whole registry state
    pub fn snapshot(&self) -> RegistryState {
        self.read_state().clone()
    }

    pub fn base_dir(&self) -> &Path {
        self.loader.base_dir()
    }

    pub fn metadata(&self) -> &Arc<ModuleMetadataRegistry> {
        &self.metadata
    }

    /// Names registered for `class`, in registration order
    fn modules_for_class(&self, class: &ModuleClass) -> Vec<ModuleName> {
        self.metadata
            .entries()
            .into_iter()
            .filter(|(_, entry)| entry.class == *class)
            .map(|(name, _)| name)
            .collect()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("loader", &self.loader)
            .field("metadata", &self.metadata)
            .field("default_modules", &self.default_modules)
            .field("state", &*self.read_state())
            .finish_non_exhaustive()
    }
}
