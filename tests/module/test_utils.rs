//! Test utilities for module registry testing
//!
//! Provides mock modules that record every capability call, an importer that
//! records attempted entries, and a fixture wiring them into a registry.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use module_registry::config::ModulesConfig;
use module_registry::module::error::ImportError;
use module_registry::module::loader::{EntryCandidate, ModuleImporter};
use module_registry::module::{
    Entity, LicenseFlag, Module, ModuleClass, ModuleDeclaration, ModuleError, ModuleLoader,
    ModuleMetadataRegistry, ModuleName, ModuleRegistry, ModuleSettings, StaticLicense,
    StaticModuleCatalog,
};

/// Shared record of capability calls, formatted `"{module}:{capability}"`
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, module: &str, capability: &str) {
        self.0.lock().unwrap().push(format!("{module}:{capability}"));
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

/// Mock module for testing
///
/// Every capability is recorded in the shared [`CallLog`]; any of them can be
/// made to fail.
#[derive(Debug, Clone)]
pub struct MockModule {
    pub name: String,
    pub log: CallLog,
    pub entities: Vec<Entity>,
    pub load_dir: Option<PathBuf>,
    pub settings: Option<ModuleSettings>,
    pub fail_on: Option<&'static str>,
}

impl MockModule {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            entities: Vec::new(),
            load_dir: None,
            settings: None,
            fail_on: None,
        }
    }

    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_load_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.load_dir = Some(dir.into());
        self
    }

    pub fn with_settings(mut self, settings: ModuleSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn failing_on(mut self, capability: &'static str) -> Self {
        self.fail_on = Some(capability);
        self
    }

    /// Declaration whose class constructs a clone of this mock
    pub fn declaration(&self) -> ModuleDeclaration {
        let template = self.clone();
        ModuleDeclaration::new(
            self.name.parse().unwrap(),
            ModuleClass::new(move || template.clone()),
        )
    }

    fn call(&self, capability: &'static str) -> Result<(), ModuleError> {
        self.log.record(&self.name, capability);
        if self.fail_on == Some(capability) {
            return Err(ModuleError::OperationError(format!(
                "{} failed in {}",
                self.name, capability
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Module for MockModule {
    async fn entities(&self) -> Result<Vec<Entity>, ModuleError> {
        self.call("entities")?;
        Ok(self.entities.clone())
    }

    async fn load_dir(&self) -> Result<Option<PathBuf>, ModuleError> {
        self.call("load_dir")?;
        Ok(self.load_dir.clone())
    }

    async fn init(&self) -> Result<(), ModuleError> {
        self.call("init")
    }

    async fn settings(&self) -> Result<Option<ModuleSettings>, ModuleError> {
        self.call("settings")?;
        Ok(self.settings.clone())
    }

    async fn shutdown(&self) -> Result<(), ModuleError> {
        self.call("shutdown")
    }
}

/// Importer that records every attempted entry before delegating
#[derive(Debug, Default)]
pub struct RecordingImporter {
    pub catalog: StaticModuleCatalog,
    pub attempts: Mutex<Vec<PathBuf>>,
}

impl RecordingImporter {
    pub fn new(catalog: StaticModuleCatalog) -> Self {
        Self {
            catalog,
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<PathBuf> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModuleImporter for RecordingImporter {
    async fn import(
        &self,
        candidate: &EntryCandidate,
        metadata: &ModuleMetadataRegistry,
    ) -> Result<(), ImportError> {
        self.attempts.lock().unwrap().push(candidate.path.clone());
        self.catalog.import(candidate, metadata).await
    }
}

/// Test fixture wiring mocks into a registry
pub struct RegistryFixture {
    pub registry: Arc<ModuleRegistry>,
    pub importer: Arc<RecordingImporter>,
    pub config: Arc<RwLock<ModulesConfig>>,
    pub log: CallLog,
}

pub const BASE_DIR: &str = "/srv/host/dist/modules";

impl RegistryFixture {
    /// Registry with no default modules over `catalog`
    pub fn new(catalog: StaticModuleCatalog, license: StaticLicense, log: &CallLog) -> Self {
        let importer = Arc::new(RecordingImporter::new(catalog));
        let config = Arc::new(RwLock::new(ModulesConfig::default()));
        let registry = ModuleRegistry::new(
            config.clone(),
            Arc::new(license),
            ModuleLoader::new(BASE_DIR, importer.clone()),
        )
        .with_default_modules(Vec::new());

        Self {
            registry: Arc::new(registry),
            importer,
            config,
            log: log.clone(),
        }
    }

    pub fn enable(&self, names: &[&str]) {
        self.config.write().unwrap().enabled_modules = names.iter().map(|n| name(n)).collect();
    }

    pub fn disable(&self, names: &[&str]) {
        self.config.write().unwrap().disabled_modules = names.iter().map(|n| name(n)).collect();
    }
}

pub fn name(s: &str) -> ModuleName {
    s.parse().unwrap()
}

pub fn names(list: &[&str]) -> Vec<ModuleName> {
    list.iter().map(|s| name(s)).collect()
}

pub fn licensed(flags: &[&'static str]) -> StaticLicense {
    StaticLicense::new(flags.iter().map(|f| LicenseFlag::from_static(f)))
}
