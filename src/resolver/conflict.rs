// src/resolver/conflict.rs

//! Version conflicts detected during resolution

use super::tolerance::Tolerance;
use crate::package::PackageId;

/// A native dependency whose versions cannot be reconciled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub package: PackageId,
    /// Distinct versions found across MiniApps, in first-seen order
    pub versions: Vec<String>,
    /// Tolerance of the category the conflict was found in
    pub tolerance: Tolerance,
}

impl std::fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Conflicting versions of {} ({} tolerance): {}",
            self.package,
            self.tolerance,
            self.versions.join(", ")
        )
    }
}
