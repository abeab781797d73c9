// relink-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use super::error::{RelinkError, Result};
use super::path::normalize_lexically;

const DEFAULT_MANIFEST_FILE: &str = "package.json";
const DEFAULT_STORE_DIR: &str = "node_modules";
const DEFAULT_INSTALL_COMMAND: &str = "npm install";
const DEFAULT_LOCAL_SCHEMES: &[&str] = &["file"];

#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub manifest_file: String,
    pub store_dir_name: String,
    pub link_registry: PathBuf,
    pub local_schemes: Vec<String>,
    pub install_command: String,
}

impl Config {
    /// Builds the run configuration. `project_root` wins over
    /// `RELINK_PROJECT_ROOT`, which wins over the current directory.
    pub fn load(project_root: Option<PathBuf>) -> Result<Self> {
        debug!("Loading relink configuration");

        let requested_root =
            project_root.or_else(|| non_empty_var("RELINK_PROJECT_ROOT").map(PathBuf::from));
        let project_root = match requested_root {
            Some(root) => root,
            None => env::current_dir().map_err(|e| {
                RelinkError::Config(format!("Could not determine current directory: {e}"))
            })?,
        };
        let project_root = absolute_root(&project_root)?;
        debug!("Effective project root: {}", project_root.display());

        let link_registry = match non_empty_var("RELINK_LINK_REGISTRY") {
            Some(dir) => PathBuf::from(dir),
            None => default_link_registry()?,
        };
        debug!("Global link registry: {}", link_registry.display());

        let local_schemes = non_empty_var("RELINK_LOCAL_SCHEMES")
            .map(|raw| parse_schemes(&raw))
            .filter(|schemes| !schemes.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCAL_SCHEMES.iter().map(|s| s.to_string()).collect());

        let install_command = non_empty_var("RELINK_INSTALL_CMD")
            .unwrap_or_else(|| DEFAULT_INSTALL_COMMAND.to_string());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            project_root,
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            store_dir_name: DEFAULT_STORE_DIR.to_string(),
            link_registry,
            local_schemes,
            install_command,
        })
    }

    /// A configuration with fixed roots and default conventions, ignoring the
    /// environment.
    pub fn with_roots(project_root: impl Into<PathBuf>, link_registry: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            store_dir_name: DEFAULT_STORE_DIR.to_string(),
            link_registry: link_registry.into(),
            local_schemes: DEFAULT_LOCAL_SCHEMES.iter().map(|s| s.to_string()).collect(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn link_registry(&self) -> &Path {
        &self.link_registry
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest_file)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.project_root.join(&self.store_dir_name)
    }

    pub fn store_entry_path(&self, name: &str) -> PathBuf {
        self.store_dir().join(name)
    }

    pub fn registry_entry_path(&self, name: &str) -> PathBuf {
        self.link_registry.join(name)
    }

    /// Where a declared relative path points, joined onto the project root
    /// and normalized the way a path join would.
    pub fn declared_target_path(&self, relative: &str) -> PathBuf {
        normalize_lexically(&self.project_root.join(relative))
    }

    pub fn logs_dir(&self) -> PathBuf {
        BaseDirs::new()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(env::temp_dir)
            .join("relink")
            .join("logs")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn default_link_registry() -> Result<PathBuf> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| RelinkError::Config("Could not determine home directory".to_string()))?;
    Ok(dirs.home_dir().join(".config").join("yarn").join("link"))
}

fn parse_schemes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches(':').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Canonical when possible so comparisons against resolved link targets line up.
fn absolute_root(root: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = root.canonicalize() {
        return Ok(canonical);
    }
    if root.is_absolute() {
        return Ok(normalize_lexically(root));
    }
    let cwd = env::current_dir()
        .map_err(|e| RelinkError::Config(format!("Could not determine current directory: {e}")))?;
    Ok(normalize_lexically(&cwd.join(root)))
}
