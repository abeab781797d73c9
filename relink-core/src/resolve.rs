// relink-core/src/resolve.rs
use futures::future::join_all;
use futures::join;
use relink_aio::LinkFs;
use relink_common::model::{
    LinkedDependency, ResolvedDependency, Unavailability, UnavailableDependency,
};
use relink_common::path::strip_relative_suffix;
use relink_common::Config;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub resolved: Vec<ResolvedDependency>,
    /// Store entries whose link chain could not be followed to a real path.
    pub unresolved: Vec<UnavailableDependency>,
}

/// Resolves each store entry to its canonical path and records where the
/// global registry entry lives. All dependencies are resolved concurrently.
#[instrument(skip_all, fields(count = available.len()))]
pub async fn resolve_paths<F: LinkFs>(
    fs: &F,
    config: &Config,
    available: Vec<LinkedDependency>,
) -> Resolution {
    let results = join_all(available.into_iter().map(|dep| resolve_one(fs, config, dep))).await;

    let mut resolution = Resolution::default();
    for result in results {
        match result {
            Ok(resolved) => resolution.resolved.push(resolved),
            Err(unresolved) => resolution.unresolved.push(unresolved),
        }
    }
    resolution
}

async fn resolve_one<F: LinkFs>(
    fs: &F,
    config: &Config,
    dependency: LinkedDependency,
) -> Result<ResolvedDependency, UnavailableDependency> {
    let store_entry_path = config.store_entry_path(&dependency.name);
    let global_registry_path = config.registry_entry_path(&dependency.name);
    let (canonical, link_target, global_registry_exists) = join!(
        fs.canonicalize(&store_entry_path),
        fs.read_link(&store_entry_path),
        fs.entry_exists(&global_registry_path)
    );

    let canonical_path = match canonical {
        Ok(path) => path,
        Err(e) => {
            warn!(
                "Could not resolve {} ({}): {}",
                dependency.name,
                store_entry_path.display(),
                e
            );
            return Err(UnavailableDependency {
                dependency,
                reason: Unavailability::MissingStoreEntry,
                path: store_entry_path,
                detail: Some(e.to_string()),
            });
        }
    };

    let implied_project_root =
        strip_relative_suffix(&canonical_path, &dependency.declared_relative_path);
    if implied_project_root.is_none() {
        debug!(
            "{}: '{}' is not a suffix of {}; implied project root unknown",
            dependency.name,
            dependency.declared_relative_path,
            canonical_path.display()
        );
    }

    Ok(ResolvedDependency {
        expected_installed_path: config.declared_target_path(&dependency.declared_relative_path),
        dependency,
        store_entry_path,
        store_link_target: link_target.ok(),
        global_registry_path,
        global_registry_exists,
        canonical_path,
        implied_project_root,
    })
}
