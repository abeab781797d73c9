// relink-common/src/model/report.rs
use serde::{Serialize, Serializer};

use super::dependency::{CheckedDependency, LinkedDependency, UnavailableDependency, Verdict};
use crate::error::RelinkError;

/// Progress of a single dependency through the repair sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepairStage {
    Mismatched,
    RegistryCleared,
    StoreCleared,
    RegistryLinked,
    Repaired,
}

impl RepairStage {
    pub fn next(self) -> Option<Self> {
        match self {
            RepairStage::Mismatched => Some(RepairStage::RegistryCleared),
            RepairStage::RegistryCleared => Some(RepairStage::StoreCleared),
            RepairStage::StoreCleared => Some(RepairStage::RegistryLinked),
            RepairStage::RegistryLinked => Some(RepairStage::Repaired),
            RepairStage::Repaired => None,
        }
    }

    /// Describes the step that moves a dependency out of this stage.
    pub fn pending_step(self) -> &'static str {
        match self {
            RepairStage::Mismatched => "remove global registry link",
            RepairStage::RegistryCleared => "remove store entry",
            RepairStage::StoreCleared => "link global registry entry to declared path",
            RepairStage::RegistryLinked => "link store entry to global registry entry",
            RepairStage::Repaired => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    pub name: String,
    /// Last stage that completed.
    pub reached: RepairStage,
    #[serde(serialize_with = "serialize_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<RelinkError>,
}

impl RepairOutcome {
    pub fn is_success(&self) -> bool {
        self.reached == RepairStage::Repaired && self.error.is_none()
    }
}

fn serialize_error<S: Serializer>(error: &Option<RelinkError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_str(&e.to_string()),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "state", content = "outcomes", rename_all = "kebab-case")]
pub enum RepairSummary {
    #[default]
    NotAttempted,
    Declined,
    Attempted(Vec<RepairOutcome>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassStatus {
    Clean,
    IssuesRemain,
}

/// Everything one reconciliation pass found and did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub linked: Vec<LinkedDependency>,
    pub unavailable: Vec<UnavailableDependency>,
    pub checked: Vec<CheckedDependency>,
    pub repair: RepairSummary,
}

impl ReconcileReport {
    pub fn mismatched(&self) -> impl Iterator<Item = &CheckedDependency> {
        self.checked
            .iter()
            .filter(|c| c.verdict == Verdict::Mismatched)
    }

    pub fn has_mismatches(&self) -> bool {
        self.mismatched().next().is_some()
    }

    pub fn repair_outcomes(&self) -> &[RepairOutcome] {
        match &self.repair {
            RepairSummary::Attempted(outcomes) => outcomes,
            _ => &[],
        }
    }

    pub fn status(&self) -> PassStatus {
        if !self.unavailable.is_empty() {
            return PassStatus::IssuesRemain;
        }
        if !self.has_mismatches() {
            return PassStatus::Clean;
        }
        let outcomes = self.repair_outcomes();
        let all_repaired = self.mismatched().all(|c| {
            outcomes
                .iter()
                .any(|o| o.name == c.dependency.dependency.name && o.is_success())
        });
        if all_repaired {
            PassStatus::Clean
        } else {
            PassStatus::IssuesRemain
        }
    }
}
