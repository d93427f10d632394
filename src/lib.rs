//! Module Registry - lifecycle management for optional feature modules
//!
//! This crate decides which optional modules run in a host process, loads
//! their code from one of two candidate locations, aggregates what they
//! contribute (persistence entities, static resource directories) and drives
//! each of them through init, active and shutdown, gated by licensing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use module_registry::config::RegistryConfig;
//! use module_registry::module::builtin::registry_from_config;
//!
//! # async fn run() -> Result<(), module_registry::module::RegistryError> {
//! let registry = registry_from_config(&RegistryConfig::default());
//! registry.load_modules(None).await?;
//! registry.init_modules().await?;
//! for name in registry.active_modules() {
//!     println!("{name} is active");
//! }
//! registry.shutdown_all().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! 1. **Load before init**: init only reaches modules whose code was imported
//! 2. **No silent recovery**: configuration, load, init and shutdown failures
//!    propagate to the caller
//! 3. **Sequential lifecycle**: modules load and initialize one at a time

pub mod config;
pub mod module;
pub mod utils;

pub use config::{ModulesConfig, RegistryConfig};
pub use module::{ModuleName, ModuleRegistry, RegistryError};
