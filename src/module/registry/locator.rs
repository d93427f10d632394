//! Module location
//!
//! Resolves the one base directory every module's code lives under. Two
//! heuristics are tried in order: the installed companion package, then a
//! path relative to the running executable. The result is a best-effort
//! guess; a wrong guess surfaces later as a missing module.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::utils::{env_bool, env_opt};

/// Environment variable naming the companion package's installed root
pub const PACKAGE_ROOT_ENV: &str = "MODULE_REGISTRY_PACKAGE_ROOT";
/// Environment variable marking a test run
pub const TEST_ENV: &str = "MODULE_REGISTRY_TEST";

const SOURCE_DIR: &str = "src";
const DIST_DIR: &str = "dist";
const MODULES_DIR: &str = "modules";

/// Filesystem and environment signals consulted by the locator
pub trait EnvironmentProbe: Send + Sync {
    /// Installed root of the companion package, if it can be resolved
    fn package_root(&self) -> Option<PathBuf>;

    fn dir_exists(&self, path: &Path) -> bool;

    /// Whether the process runs under the test environment flag
    fn is_test_env(&self) -> bool;

    /// Path of the running executable
    fn invocation_path(&self) -> Option<PathBuf>;
}

/// Probe backed by the real process environment
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    package_root: Option<PathBuf>,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit package root instead of `MODULE_REGISTRY_PACKAGE_ROOT`
    pub fn with_package_root(package_root: Option<PathBuf>) -> Self {
        Self { package_root }
    }
}

impl EnvironmentProbe for SystemProbe {
    fn package_root(&self) -> Option<PathBuf> {
        self.package_root
            .clone()
            .or_else(|| env_opt(PACKAGE_ROOT_ENV).map(PathBuf::from))
            .filter(|root| root.is_dir())
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_test_env(&self) -> bool {
        env_bool(TEST_ENV)
    }

    /// Resolved executable path, falling back to `argv[0]`
    ///
    /// `argv[0]` is only the bare name when the binary is started through
    /// `PATH`, so it is a last resort.
    fn invocation_path(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .or_else(|| std::env::args_os().next().map(PathBuf::from))
    }
}

/// Resolves the modules base directory from environment signals
#[derive(Debug, Clone)]
pub struct ModuleLocator<P = SystemProbe> {
    probe: P,
}

impl ModuleLocator<SystemProbe> {
    pub fn system() -> Self {
        Self::new(SystemProbe::new())
    }
}

impl<P: EnvironmentProbe> ModuleLocator<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Compute the modules base directory
    ///
    /// Never fails: when no heuristic applies the computed path may not exist.
    pub fn base_dir(&self) -> PathBuf {
        if let Some(base_dir) = self.packaged_base_dir() {
            info!(base_dir = %base_dir.display(), "Resolved modules directory from package root");
            return base_dir;
        }

        let base_dir = self.development_base_dir();
        info!(base_dir = %base_dir.display(), "Resolved modules directory from invocation path");
        base_dir
    }

    fn packaged_base_dir(&self) -> Option<PathBuf> {
        let root = self.probe.package_root()?;
        let source_dir = root.join(SOURCE_DIR);
        let use_source = self.probe.is_test_env() && self.probe.dir_exists(&source_dir);
        debug!(
            root = %root.display(),
            use_source,
            "Companion package resolved"
        );
        let code_dir = if use_source { source_dir } else { root.join(DIST_DIR) };
        Some(code_dir.join(MODULES_DIR))
    }

    /// Two levels above the executable, then `dist/modules`
    ///
    /// An executable path without two parent levels (a bare name) leaves
    /// `dist/modules` relative to the working directory.
    fn development_base_dir(&self) -> PathBuf {
        let root = self
            .probe
            .invocation_path()
            .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
            .unwrap_or_default();
        root.join(DIST_DIR).join(MODULES_DIR)
    }
}
