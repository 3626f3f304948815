// src/resolver/plan.rs

//! Resolution result data structures

use std::collections::HashSet;

use super::conflict::VersionConflict;
use super::tolerance::Tolerance;
use crate::error::{Error, Result};
use crate::package::{PackageId, PackageRef};

/// Result of native dependency version resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    /// One reference per resolved identity, in first-seen order
    pub resolved: Vec<PackageRef>,
    /// Names of the dependencies whose versions could not be reconciled
    pub plugins_with_mismatching_versions: Vec<String>,
    /// Details of every mismatch
    pub conflicts: Vec<VersionConflict>,
    /// Third-party native modules unknown to the manifest. They also appear
    /// in `resolved` but never in the mismatches
    pub untracked: Vec<PackageRef>,
}

impl ResolutionResult {
    /// True when every dependency resolved
    pub fn is_clean(&self) -> bool {
        self.plugins_with_mismatching_versions.is_empty()
    }

    /// Escalate mismatches into an error
    pub fn ensure_no_mismatches(self) -> Result<Self> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(Error::VersionMismatch(
                self.plugins_with_mismatching_versions.clone(),
            ))
        }
    }

    /// The resolved reference for an identity, if any
    pub fn find(&self, id: &PackageId) -> Option<&PackageRef> {
        self.resolved.iter().find(|p| p.id() == id)
    }

    /// Find a resolved reference by its printed name (`name` or `@scope/name`)
    pub fn find_by_name(&self, name: &str) -> Option<&PackageRef> {
        self.resolved.iter().find(|p| p.id().to_string() == name)
    }

    pub fn is_mismatching(&self, id: &PackageId) -> bool {
        self.conflicts.iter().any(|c| &c.package == id)
    }

    /// Fold another partial result into this one
    ///
    /// A dependency mismatching in either side, or resolved to different
    /// versions on each side, is dropped from `resolved`. File path and
    /// unversioned references never disagree with anything: the versioned
    /// side wins, and this side wins when neither has a version.
    pub fn merge(&mut self, other: ResolutionResult) {
        for conflict in other.conflicts {
            self.add_conflict(conflict);
        }

        for package in other.resolved {
            let Some(i) = self.resolved.iter().position(|p| p.id() == package.id()) else {
                self.resolved.push(package);
                continue;
            };

            let kept = comparable_version(&self.resolved[i]);
            let incoming = comparable_version(&package);
            match (kept, incoming) {
                (Some(kept), Some(incoming)) if kept != incoming => {
                    self.add_conflict(VersionConflict {
                        package: package.id().clone(),
                        versions: vec![kept, incoming],
                        tolerance: Tolerance::Exact,
                    });
                }
                (None, Some(_)) => self.resolved[i] = package,
                _ => {}
            }
        }

        for package in other.untracked {
            if !self.untracked.contains(&package) {
                self.untracked.push(package);
            }
        }

        let mismatching: HashSet<&PackageId> = self.conflicts.iter().map(|c| &c.package).collect();
        self.resolved.retain(|p| !mismatching.contains(p.id()));
    }

    fn add_conflict(&mut self, conflict: VersionConflict) {
        if !self.is_mismatching(&conflict.package) {
            self.plugins_with_mismatching_versions
                .push(conflict.package.to_string());
            self.conflicts.push(conflict);
        }
    }
}

fn comparable_version(package: &PackageRef) -> Option<String> {
    if package.is_file_path() {
        return None;
    }
    package.version().map(str::to_string)
}
