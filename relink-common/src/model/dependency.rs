// relink-common/src/model/dependency.rs
//! Per-dependency records, one type per completed phase.
use std::path::PathBuf;

use serde::Serialize;

/// A raw `name -> specifier` entry from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpecifier {
    pub name: String,
    pub specifier: String,
}

/// A manifest entry whose specifier points at a local path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedDependency {
    pub name: String,
    pub specifier: String,
    /// Path segment after the scheme, relative to the project root. Never empty.
    pub declared_relative_path: String,
}

/// Which availability check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unavailability {
    MissingDeclaredTarget,
    MissingStoreEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableDependency {
    pub dependency: LinkedDependency,
    pub reason: Unavailability,
    /// The path whose check failed.
    pub path: PathBuf,
    /// Underlying error text, when the failure came from an I/O call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A dependency whose store entry resolved to a real path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    #[serde(flatten)]
    pub dependency: LinkedDependency,
    pub store_entry_path: PathBuf,
    /// Immediate target of the store entry; `None` when it is not a symlink.
    pub store_link_target: Option<PathBuf>,
    pub expected_installed_path: PathBuf,
    pub global_registry_path: PathBuf,
    pub global_registry_exists: bool,
    pub canonical_path: PathBuf,
    /// `canonical_path` minus the declared suffix; `None` when the declared
    /// path is not a literal trailing run of `canonical_path`.
    pub implied_project_root: Option<PathBuf>,
}

impl ResolvedDependency {
    pub fn name(&self) -> &str {
        &self.dependency.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Ok,
    Mismatched,
    MissingDeclaredTarget,
    MissingStoreEntry,
}

impl From<Unavailability> for Verdict {
    fn from(reason: Unavailability) -> Self {
        match reason {
            Unavailability::MissingDeclaredTarget => Verdict::MissingDeclaredTarget,
            Unavailability::MissingStoreEntry => Verdict::MissingStoreEntry,
        }
    }
}

/// A resolved dependency paired with its comparison result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedDependency {
    #[serde(flatten)]
    pub dependency: ResolvedDependency,
    pub verdict: Verdict,
}
