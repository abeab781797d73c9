// Shared fixtures for the in-crate tests. The project lives at /work/app.
use relink_common::model::{DependencySpecifier, LinkedDependency};
use relink_common::Config;

pub const REGISTRY: &str = "/home/u/.config/yarn/link";

pub fn config() -> Config {
    Config::with_roots("/work/app", REGISTRY)
}

/// `name` declared as `file:../name`.
pub fn linked(name: &str) -> LinkedDependency {
    linked_at(name, &format!("../{name}"))
}

pub fn linked_at(name: &str, relative: &str) -> LinkedDependency {
    LinkedDependency {
        name: name.to_string(),
        specifier: format!("file:{relative}"),
        declared_relative_path: relative.to_string(),
    }
}

pub fn specs(entries: &[(&str, &str)]) -> Vec<DependencySpecifier> {
    entries
        .iter()
        .map(|(name, specifier)| DependencySpecifier {
            name: name.to_string(),
            specifier: specifier.to_string(),
        })
        .collect()
}
