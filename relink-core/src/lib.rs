// relink-core/src/lib.rs
//! Audits and repairs dependencies that are linked from the local filesystem.

pub mod availability;
pub mod classify;
pub mod detect;
pub mod reconcile;
pub mod repair;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use availability::{check_availability, Availability};
pub use classify::classify;
pub use detect::detect_mismatches;
pub use reconcile::Reconciler;
pub use repair::{repair_all, repair_dependency};
pub use resolve::{resolve_paths, Resolution};
