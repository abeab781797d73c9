// relink-common/src/model/mod.rs
pub mod dependency;
pub mod report;

pub use dependency::{
    CheckedDependency, DependencySpecifier, LinkedDependency, ResolvedDependency,
    Unavailability, UnavailableDependency, Verdict,
};
pub use report::{PassStatus, ReconcileReport, RepairOutcome, RepairStage, RepairSummary};
