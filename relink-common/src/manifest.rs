// relink-common/src/manifest.rs
//! Reads the project descriptor and exposes its `dependencies` section.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RelinkError, Result};
use crate::model::DependencySpecifier;

const DEPENDENCIES_FIELD: &str = "dependencies";

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    raw: Value,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading manifest: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RelinkError::Manifest(format!("{} does not exist", path.display()))
            } else {
                RelinkError::from(e)
            }
        })?;
        Self::parse(path, &content)
    }

    /// Parses manifest text that was read from `path`.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(content)?;
        Ok(Self {
            path: path.to_path_buf(),
            raw,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The declared dependencies, ordered by name.
    ///
    /// A missing or non-object `dependencies` field is a hard error; entries
    /// whose value is not a string are skipped.
    pub fn dependencies(&self) -> Result<Vec<DependencySpecifier>> {
        let section = self
            .raw
            .get(DEPENDENCIES_FIELD)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                RelinkError::Manifest(format!(
                    "'{DEPENDENCIES_FIELD}' field in {} does not exist or is not an object",
                    self.path.display()
                ))
            })?;

        let mut deps = Vec::with_capacity(section.len());
        for (name, value) in section {
            match value.as_str() {
                Some(specifier) => deps.push(DependencySpecifier {
                    name: name.clone(),
                    specifier: specifier.to_string(),
                }),
                None => warn!("Skipping dependency '{}': specifier is not a string", name),
            }
        }
        deps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(content: &str) -> Result<Manifest> {
        Manifest::parse(Path::new("/work/app/package.json"), content)
    }

    #[test]
    fn reads_string_dependencies_in_name_order() {
        let manifest = parse(
            r#"{"name":"app","dependencies":{"zeta":"^1.0.0","lib-a":"file:../lib-a","bad":42}}"#,
        )
        .unwrap();
        let deps = manifest.dependencies().unwrap();
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["lib-a", "zeta"]);
        assert_eq!(deps[0].specifier, "file:../lib-a");
    }

    #[test]
    fn missing_dependencies_section_is_a_manifest_error() {
        let manifest = parse(r#"{"name":"app"}"#).unwrap();
        assert!(matches!(manifest.dependencies(), Err(RelinkError::Manifest(_))));
    }

    #[test]
    fn non_object_dependencies_section_is_a_manifest_error() {
        let manifest = parse(r#"{"dependencies":["lib-a"]}"#).unwrap();
        assert!(matches!(manifest.dependencies(), Err(RelinkError::Manifest(_))));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(parse("{not json"), Err(RelinkError::Json(_))));
    }

    #[test]
    fn missing_file_is_a_manifest_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::load(&dir.path().join("package.json"));
        assert!(matches!(result, Err(RelinkError::Manifest(_))));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"dependencies":{{"lib-a":"file:../lib-a"}}}}"#).unwrap();
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.path(), path.as_path());
        assert_eq!(manifest.dependencies().unwrap().len(), 1);
    }
}
