// relink-core/src/reconcile.rs
//! One reconciliation pass: classify, check, resolve, detect, then
//! optionally repair.
use relink_aio::LinkFs;
use relink_common::model::{
    DependencySpecifier, ReconcileReport, RepairSummary, ResolvedDependency,
};
use relink_common::Config;
use tracing::{debug, instrument, warn};

use crate::availability::check_availability;
use crate::classify::classify;
use crate::detect::detect_mismatches;
use crate::repair::repair_all;
use crate::resolve::resolve_paths;

/// Drives the reconciliation phases against a filesystem.
///
/// Each phase waits for every dependency before the next one starts. The
/// read-only phases never fail; everything they find lands in the report.
pub struct Reconciler<'a, F> {
    fs: &'a F,
    config: &'a Config,
}

impl<'a, F: LinkFs> Reconciler<'a, F> {
    pub fn new(fs: &'a F, config: &'a Config) -> Self {
        Self { fs, config }
    }

    /// Runs every read-only phase. Resolution and detection are skipped for
    /// the whole batch as soon as any dependency is unavailable.
    #[instrument(skip_all, fields(project = %self.config.project_root().display()))]
    pub async fn inspect(&self, specifiers: &[DependencySpecifier]) -> ReconcileReport {
        let linked = classify(specifiers, &self.config.local_schemes);
        debug!(
            "{} of {} dependencies are linked locally",
            linked.len(),
            specifiers.len()
        );

        let availability = check_availability(self.fs, self.config, &linked).await;
        let mut report = ReconcileReport {
            linked,
            unavailable: availability.unavailable,
            ..Default::default()
        };
        if !report.unavailable.is_empty() {
            warn!(
                "{} linked dependencies are unavailable; skipping resolution",
                report.unavailable.len()
            );
            return report;
        }

        let resolution = resolve_paths(self.fs, self.config, availability.available).await;
        if !resolution.unresolved.is_empty() {
            warn!(
                "{} store entries could not be resolved; skipping detection",
                resolution.unresolved.len()
            );
            report.unavailable = resolution.unresolved;
            return report;
        }

        report.checked = detect_mismatches(resolution.resolved);
        report
    }

    /// Repairs every mismatched dependency in `report` and records the
    /// outcomes. Does nothing when the report has unavailable entries or no
    /// mismatches.
    #[instrument(skip_all, fields(registry = %self.config.link_registry().display()))]
    pub async fn repair(&self, report: &mut ReconcileReport) {
        if !report.unavailable.is_empty() {
            warn!("Refusing to repair while dependencies are unavailable");
            return;
        }
        let outcomes = {
            let targets: Vec<&ResolvedDependency> =
                report.mismatched().map(|c| &c.dependency).collect();
            if targets.is_empty() {
                debug!("Nothing to repair");
                return;
            }
            repair_all(self.fs, &targets).await
        };
        report.repair = RepairSummary::Attempted(outcomes);
    }

    /// A full pass. `approve` sees the inspection result and decides whether
    /// mismatches get repaired; it is only asked when there is something to
    /// repair.
    pub async fn run(
        &self,
        specifiers: &[DependencySpecifier],
        approve: impl FnOnce(&ReconcileReport) -> bool,
    ) -> ReconcileReport {
        let mut report = self.inspect(specifiers).await;
        if !report.unavailable.is_empty() || !report.has_mismatches() {
            return report;
        }
        if approve(&report) {
            self.repair(&mut report).await;
        } else {
            report.repair = RepairSummary::Declined;
        }
        report
    }
}
