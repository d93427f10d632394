//! Module system traits and interfaces
//!
//! Defines the identifiers a module is known by and the capability trait the
//! registry drives through load, init and shutdown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Module name (unique identifier)
///
/// Lower-case kebab-case: `[a-z0-9]` and `-`, never leading or trailing `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(Cow<'static, str>);

impl ModuleName {
    /// Built-in usage insights module
    pub const INSIGHTS: ModuleName = ModuleName(Cow::Borrowed("insights"));
    /// Built-in external secrets providers module
    pub const EXTERNAL_SECRETS: ModuleName = ModuleName(Cow::Borrowed("external-secrets"));

    /// Create a module name, validating its format
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidModuleName> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(Cow::Owned(name)))
        } else {
            Err(InvalidModuleName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('-')
            && !name.ends_with('-')
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleName {
    type Err = InvalidModuleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModuleName {
    type Error = InvalidModuleName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0.into_owned()
    }
}

/// Rejected module name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid module name {0:?}: expected lower-case kebab-case")]
pub struct InvalidModuleName(pub String);

/// License capability gating a module's initialization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseFlag(Cow<'static, str>);

impl LicenseFlag {
    pub const fn from_static(flag: &'static str) -> Self {
        Self(Cow::Borrowed(flag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LicenseFlag {
    fn from(flag: &str) -> Self {
        Self(Cow::Owned(flag.to_string()))
    }
}

impl fmt::Display for LicenseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence schema contribution of a module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type name
    pub name: Cow<'static, str>,
    /// Backing table
    pub table: Cow<'static, str>,
}

impl Entity {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            table: Cow::Borrowed(table),
        }
    }
}

/// Opaque settings a module exposes once initialized
pub type ModuleSettings = serde_json::Value;

/// Module trait that all modules must implement
///
/// Every capability has a no-op default, so a module only overrides what it
/// actually contributes. The registry resolves one shared instance per module
/// class and calls these strictly one at a time.
#[async_trait]
pub trait Module: Send + Sync {
    /// Persistence entities this module contributes
    async fn entities(&self) -> Result<Vec<Entity>, ModuleError> {
        Ok(Vec::new())
    }

    /// Directory of static resources this module contributes
    async fn load_dir(&self) -> Result<Option<PathBuf>, ModuleError> {
        Ok(None)
    }

    /// Initialize the module
    ///
    /// Called once per init pass after the license check passed.
    async fn init(&self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Settings to expose after initialization
    async fn settings(&self) -> Result<Option<ModuleSettings>, ModuleError> {
        Ok(None)
    }

    /// Shutdown the module
    async fn shutdown(&self) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Errors raised by a module's own capabilities
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Module initialization failed: {0}")]
    InitializationError(String),

    #[error("Module operation failed: {0}")]
    OperationError(String),

    #[error("Module shutdown failed: {0}")]
    ShutdownError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ModuleError {
    fn from(e: serde_json::Error) -> Self {
        ModuleError::SerializationError(e.to_string())
    }
}

impl From<anyhow::Error> for ModuleError {
    fn from(e: anyhow::Error) -> Self {
        ModuleError::OperationError(e.to_string())
    }
}
