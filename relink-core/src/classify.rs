// relink-core/src/classify.rs
use relink_common::model::{DependencySpecifier, LinkedDependency};
use tracing::{debug, warn};

/// Picks out the specifiers that reference a local path through one of
/// `schemes` (e.g. `file:../lib-a`). Everything else is ignored.
///
/// The declared path is whatever follows the last `:`. Order is preserved.
pub fn classify(specifiers: &[DependencySpecifier], schemes: &[String]) -> Vec<LinkedDependency> {
    specifiers
        .iter()
        .filter_map(|spec| classify_one(spec, schemes))
        .collect()
}

fn classify_one(spec: &DependencySpecifier, schemes: &[String]) -> Option<LinkedDependency> {
    let (scheme, _) = spec.specifier.split_once(':')?;
    if !schemes.iter().any(|s| s == scheme) {
        return None;
    }
    let declared = spec.specifier.rsplit(':').next().unwrap_or_default();
    if declared.is_empty() {
        warn!(
            "Ignoring '{}': specifier '{}' has no path",
            spec.name, spec.specifier
        );
        return None;
    }
    debug!("{} is linked to {}", spec.name, declared);
    Some(LinkedDependency {
        name: spec.name.clone(),
        specifier: spec.specifier.clone(),
        declared_relative_path: declared.to_string(),
    })
}
