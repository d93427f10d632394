//! Candidate entry paths for a module
//!
//! A module lives either at `{base}/{name}/{name}.module` (standard) or at
//! `{base}/{name}.ee/{name}.module` (enterprise). Pure path computation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::module::traits::ModuleName;

const ENTRY_SUFFIX: &str = ".module";
const ENTERPRISE_SUFFIX: &str = ".ee";

/// Which of the two locations an entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Standard,
    Enterprise,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Standard => f.write_str("standard"),
            EntryKind::Enterprise => f.write_str("enterprise"),
        }
    }
}

/// One candidate module entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCandidate {
    pub kind: EntryKind,
    /// Entry path relative to the modules base directory
    pub relative: PathBuf,
    /// Absolute entry path
    pub path: PathBuf,
}

impl EntryCandidate {
    fn new(base_dir: &Path, kind: EntryKind, relative: PathBuf) -> Self {
        Self {
            kind,
            path: base_dir.join(&relative),
            relative,
        }
    }
}

/// Entry path of a module relative to the base directory
pub fn relative_entry(name: &ModuleName, kind: EntryKind) -> PathBuf {
    let dir = match kind {
        EntryKind::Standard => name.to_string(),
        EntryKind::Enterprise => format!("{name}{ENTERPRISE_SUFFIX}"),
    };
    PathBuf::from(dir).join(format!("{name}{ENTRY_SUFFIX}"))
}

/// Standard then enterprise candidate for `name` under `base_dir`
pub fn entry_candidates(base_dir: &Path, name: &ModuleName) -> [EntryCandidate; 2] {
    [
        EntryCandidate::new(
            base_dir,
            EntryKind::Standard,
            relative_entry(name, EntryKind::Standard),
        ),
        EntryCandidate::new(
            base_dir,
            EntryKind::Enterprise,
            relative_entry(name, EntryKind::Enterprise),
        ),
    ]
}
