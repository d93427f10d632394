//! Module registry building blocks
//!
//! Eligibility, location, module metadata and the instance container.

pub mod container;
pub mod eligibility;
pub mod locator;
pub mod metadata;

pub use container::ModuleContainer;
pub use eligibility::{eligible_modules, DEFAULT_MODULES};
pub use locator::{EnvironmentProbe, ModuleLocator, SystemProbe};
pub use metadata::{
    ClassId, ModuleClass, ModuleDeclaration, ModuleMetadataEntry, ModuleMetadataRegistry,
};
