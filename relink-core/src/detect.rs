// relink-core/src/detect.rs
use relink_common::model::{CheckedDependency, ResolvedDependency, Verdict};
use relink_common::path::normalize_lexically;

/// Compares where each dependency should be installed against where its store
/// entry really points. No filesystem access.
pub fn detect_mismatches(resolved: Vec<ResolvedDependency>) -> Vec<CheckedDependency> {
    resolved.into_iter().map(check).collect()
}

pub fn check(dependency: ResolvedDependency) -> CheckedDependency {
    let expected = normalize_lexically(&dependency.expected_installed_path);
    let actual = normalize_lexically(&dependency.canonical_path);
    let verdict = if expected == actual {
        Verdict::Ok
    } else {
        Verdict::Mismatched
    };
    CheckedDependency {
        dependency,
        verdict,
    }
}
