//! Configuration management for the module registry
//!
//! Handles configuration loading from TOML and environment overrides, and
//! exposes the enabled/disabled module lists the registry reads on every
//! eligibility evaluation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use crate::module::traits::{InvalidModuleName, LicenseFlag, ModuleName};
use crate::utils::{env_list, env_opt};

/// Environment variable replacing `modules.enabled_modules`
pub const ENABLED_MODULES_ENV: &str = "MODULE_REGISTRY_ENABLED_MODULES";
/// Environment variable replacing `modules.disabled_modules`
pub const DISABLED_MODULES_ENV: &str = "MODULE_REGISTRY_DISABLED_MODULES";
/// Environment variable replacing `logging.filter`
pub const LOG_FILTER_ENV: &str = "MODULE_REGISTRY_LOG";

/// Source of the enabled/disabled module lists
///
/// Read on every eligibility evaluation, never cached by the registry.
pub trait ModuleConfigSource: Send + Sync {
    fn enabled_modules(&self) -> Vec<ModuleName>;
    fn disabled_modules(&self) -> Vec<ModuleName>;
}

/// Module selection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Modules enabled in addition to the built-in defaults
    #[serde(default)]
    pub enabled_modules: Vec<ModuleName>,

    /// Modules excluded even when they are defaults
    #[serde(default)]
    pub disabled_modules: Vec<ModuleName>,
}

impl ModuleConfigSource for ModulesConfig {
    fn enabled_modules(&self) -> Vec<ModuleName> {
        self.enabled_modules.clone()
    }

    fn disabled_modules(&self) -> Vec<ModuleName> {
        self.disabled_modules.clone()
    }
}

impl ModuleConfigSource for RwLock<ModulesConfig> {
    fn enabled_modules(&self) -> Vec<ModuleName> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .enabled_modules
            .clone()
    }

    fn disabled_modules(&self) -> Vec<ModuleName> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .disabled_modules
            .clone()
    }
}

/// Licensed capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// License flags that are granted
    #[serde(default)]
    pub features: Vec<LicenseFlag>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "module_registry=debug"); RUST_LOG takes precedence
    pub filter: Option<String>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

/// Module location overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Installed root of the companion package holding the modules tree
    pub package_root: Option<PathBuf>,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub modules: ModulesConfig,

    #[serde(default)]
    pub license: LicenseConfig,

    pub logging: Option<LoggingConfig>,

    #[serde(default)]
    pub locator: LocatorConfig,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value in {var}: {source}")]
    Env {
        var: &'static str,
        #[source]
        source: InvalidModuleName,
    },
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay environment variables onto the loaded configuration
    ///
    /// Module lists given in the environment replace the file's lists
    /// entirely; unset variables leave the file's values alone.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(enabled) = parse_module_list(ENABLED_MODULES_ENV)? {
            self.modules.enabled_modules = enabled;
        }
        if let Some(disabled) = parse_module_list(DISABLED_MODULES_ENV)? {
            self.modules.disabled_modules = disabled;
        }
        if let Some(filter) = env_opt(LOG_FILTER_ENV) {
            self.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter);
        }
        Ok(())
    }
}

fn parse_module_list(var: &'static str) -> Result<Option<Vec<ModuleName>>, ConfigError> {
    let Some(items) = env_list(var) else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| ModuleName::new(item).map_err(|source| ConfigError::Env { var, source }))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
