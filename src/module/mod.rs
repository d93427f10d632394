//! Module system
//!
//! Optional feature modules are selected by configuration, imported from a
//! standard or enterprise entry, and driven through init and shutdown behind
//! license checks.
//!
//! ## Architecture
//!
//! - **Eligibility**: built-in defaults plus enabled minus disabled; a module
//!   both enabled and disabled is a configuration error
//! - **Location**: one modules base directory, resolved from the installed
//!   package or the executable path
//! - **Loading**: standard entry first, enterprise entry second; importing an
//!   entry makes the module declare itself in the metadata registry
//! - **Lifecycle**: registration-order init gated by license flags, per-module
//!   shutdown

pub mod builtin;
pub mod error;
pub mod license;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod traits;

pub use error::{ImportError, RegistryError};
pub use license::{LicenseState, StaticLicense};
pub use loader::{ModuleImporter, ModuleLoader, StaticModuleCatalog};
pub use manager::{ModuleRegistry, RegistryState};
pub use registry::{
    ModuleClass, ModuleDeclaration, ModuleLocator, ModuleMetadataEntry, ModuleMetadataRegistry,
};
pub use traits::{Entity, LicenseFlag, Module, ModuleError, ModuleName, ModuleSettings};
