// relink-core/src/repair.rs
//! Rebuilds the `store -> global registry -> declared source` link chain.
use std::io;

use futures::future::join_all;
use relink_aio::LinkFs;
use relink_common::model::{RepairOutcome, RepairStage, ResolvedDependency};
use relink_common::RelinkError;
use tracing::{debug, error, info, instrument};

/// Repairs every dependency concurrently. A failure stops only the
/// dependency it belongs to; outcomes come back in input order.
#[instrument(skip_all, fields(count = dependencies.len()))]
pub async fn repair_all<F: LinkFs>(
    fs: &F,
    dependencies: &[&ResolvedDependency],
) -> Vec<RepairOutcome> {
    join_all(dependencies.iter().map(|dep| repair_dependency(fs, dep))).await
}

/// Runs the four repair steps in order. There is no rollback: on failure the
/// outcome records the last stage that completed.
///
/// The registry entry's parent directory is never created. For a scoped name
/// like `@scope/pkg` on a fresh registry the registry link fails with
/// `NotFound` after the store entry has already been removed.
pub async fn repair_dependency<F: LinkFs>(fs: &F, dep: &ResolvedDependency) -> RepairOutcome {
    let mut reached = RepairStage::Mismatched;
    while let Some(next) = reached.next() {
        if let Err(e) = run_step(fs, dep, reached).await {
            error!(
                "Repair of {} stopped at {:?} (could not {}): {}",
                dep.name(),
                reached,
                reached.pending_step(),
                e
            );
            return RepairOutcome {
                name: dep.name().to_string(),
                reached,
                error: Some(RelinkError::from(e)),
            };
        }
        debug!("{}: {:?} -> {:?}", dep.name(), reached, next);
        reached = next;
    }
    info!(
        "Relinked {} -> {} -> {}",
        dep.store_entry_path.display(),
        dep.global_registry_path.display(),
        dep.expected_installed_path.display()
    );
    RepairOutcome {
        name: dep.name().to_string(),
        reached,
        error: None,
    }
}

async fn run_step<F: LinkFs>(fs: &F, dep: &ResolvedDependency, from: RepairStage) -> io::Result<()> {
    match from {
        RepairStage::Mismatched if dep.global_registry_exists => {
            fs.remove_entry(&dep.global_registry_path).await
        }
        RepairStage::Mismatched => Ok(()),
        RepairStage::RegistryCleared => fs.remove_entry(&dep.store_entry_path).await,
        RepairStage::StoreCleared => {
            fs.symlink(&dep.expected_installed_path, &dep.global_registry_path)
                .await
        }
        RepairStage::RegistryLinked => {
            fs.symlink(&dep.global_registry_path, &dep.store_entry_path)
                .await
        }
        RepairStage::Repaired => Ok(()),
    }
}
