//! Module importers
//!
//! Importing an entry runs the module's own declaration against the metadata
//! registry. Modules are linked statically, so the default importer is a
//! catalog of declarations keyed by entry path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::module::error::ImportError;
use crate::module::loader::paths::{relative_entry, EntryCandidate, EntryKind};
use crate::module::registry::metadata::{ModuleDeclaration, ModuleMetadataRegistry};

/// Imports one candidate module entry
#[async_trait]
pub trait ModuleImporter: Send + Sync {
    /// Import the entry at `candidate`
    ///
    /// On success the module has declared itself in `metadata`.
    async fn import(
        &self,
        candidate: &EntryCandidate,
        metadata: &ModuleMetadataRegistry,
    ) -> Result<(), ImportError>;
}

/// Statically linked modules keyed by their entry path
#[derive(Debug, Clone, Default)]
pub struct StaticModuleCatalog {
    entries: HashMap<PathBuf, ModuleDeclaration>,
}

impl StaticModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a module at its standard entry
    pub fn standard(self, declaration: ModuleDeclaration) -> Self {
        self.with_entry(EntryKind::Standard, declaration)
    }

    /// Link a module at its enterprise entry
    pub fn enterprise(self, declaration: ModuleDeclaration) -> Self {
        self.with_entry(EntryKind::Enterprise, declaration)
    }

    pub fn with_entry(mut self, kind: EntryKind, declaration: ModuleDeclaration) -> Self {
        self.entries
            .insert(relative_entry(&declaration.name, kind), declaration);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ModuleImporter for StaticModuleCatalog {
    async fn import(
        &self,
        candidate: &EntryCandidate,
        metadata: &ModuleMetadataRegistry,
    ) -> Result<(), ImportError> {
        let declaration = self
            .entries
            .get(&candidate.relative)
            .ok_or_else(|| ImportError::NotFound {
                path: candidate.path.clone(),
            })?;
        debug!(
            module = %declaration.name,
            entry = %candidate.relative.display(),
            "Importing statically linked module"
        );
        metadata.declare(declaration);
        Ok(())
    }
}
