// relink-core/src/availability.rs
use futures::future::join_all;
use futures::join;
use relink_aio::LinkFs;
use relink_common::model::{LinkedDependency, Unavailability, UnavailableDependency};
use relink_common::Config;
use tracing::{debug, instrument};

/// Linked dependencies split by whether both their declared target and their
/// store entry are present.
#[derive(Debug, Clone, Default)]
pub struct Availability {
    pub available: Vec<LinkedDependency>,
    pub unavailable: Vec<UnavailableDependency>,
}

/// Checks every dependency concurrently. Read-only; a missing path is
/// recorded, never raised.
///
/// When both checks fail the declared target is reported.
#[instrument(skip_all, fields(count = linked.len()))]
pub async fn check_availability<F: LinkFs>(
    fs: &F,
    config: &Config,
    linked: &[LinkedDependency],
) -> Availability {
    let checks = linked.iter().map(|dep| check_one(fs, config, dep));
    let results = join_all(checks).await;

    let mut availability = Availability::default();
    for (dep, result) in linked.iter().zip(results) {
        match result {
            None => availability.available.push(dep.clone()),
            Some(unavailable) => availability.unavailable.push(unavailable),
        }
    }
    debug!(
        "{} available, {} unavailable",
        availability.available.len(),
        availability.unavailable.len()
    );
    availability
}

async fn check_one<F: LinkFs>(
    fs: &F,
    config: &Config,
    dep: &LinkedDependency,
) -> Option<UnavailableDependency> {
    let declared_path = config.declared_target_path(&dep.declared_relative_path);
    let store_path = config.store_entry_path(&dep.name);
    let (declared_exists, store_exists) =
        join!(fs.exists(&declared_path), fs.entry_exists(&store_path));

    let (reason, path) = if !declared_exists {
        (Unavailability::MissingDeclaredTarget, declared_path)
    } else if !store_exists {
        (Unavailability::MissingStoreEntry, store_path)
    } else {
        return None;
    };
    debug!("{}: {:?} at {}", dep.name, reason, path.display());
    Some(UnavailableDependency {
        dependency: dep.clone(),
        reason,
        path,
        detail: None,
    })
}
