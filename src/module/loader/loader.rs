//! Module loader implementation
//!
//! Imports a module from its standard entry, falling back to the enterprise
//! entry. Failing both aborts the load with the enterprise failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::module::error::RegistryError;
use crate::module::loader::importer::ModuleImporter;
use crate::module::loader::paths::{entry_candidates, EntryCandidate};
use crate::module::registry::metadata::ModuleMetadataRegistry;
use crate::module::traits::ModuleName;

/// Module loader for importing modules from the modules base directory
#[derive(Clone)]
pub struct ModuleLoader {
    base_dir: PathBuf,
    importer: Arc<dyn ModuleImporter>,
}

impl ModuleLoader {
    pub fn new(base_dir: impl Into<PathBuf>, importer: Arc<dyn ModuleImporter>) -> Self {
        Self {
            base_dir: base_dir.into(),
            importer,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Import one module, returning the entry that resolved
    pub async fn import_module(
        &self,
        name: &ModuleName,
        metadata: &ModuleMetadataRegistry,
    ) -> Result<EntryCandidate, RegistryError> {
        let [standard, enterprise] = entry_candidates(&self.base_dir, name);

        match self.importer.import(&standard, metadata).await {
            Ok(()) => {
                info!(module = %name, path = %standard.path.display(), "Loaded module");
                return Ok(standard);
            }
            Err(e) => {
                warn!(
                    module = %name,
                    path = %standard.path.display(),
                    error = %e,
                    "Standard module entry failed, trying enterprise entry"
                );
            }
        }

        match self.importer.import(&enterprise, metadata).await {
            Ok(()) => {
                info!(module = %name, path = %enterprise.path.display(), "Loaded enterprise module");
                Ok(enterprise)
            }
            Err(source) => {
                error!(
                    module = %name,
                    path = %enterprise.path.display(),
                    error = %source,
                    "Module could not be loaded from either entry"
                );
                Err(RegistryError::MissingModule {
                    name: name.clone(),
                    source,
                })
            }
        }
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}
