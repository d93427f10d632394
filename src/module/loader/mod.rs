//! Module loading
//!
//! Maps a module name to its two candidate entries, imports the first one
//! that resolves, and records the module's declaration.

pub mod importer;
pub mod loader;
pub mod paths;

pub use importer::{ModuleImporter, StaticModuleCatalog};
pub use loader::ModuleLoader;
pub use paths::{entry_candidates, EntryCandidate, EntryKind};
