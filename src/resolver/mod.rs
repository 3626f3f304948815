// src/resolver/mod.rs

//! Native dependency version resolution
//!
//! A Container embeds exactly one version of every native dependency, while
//! every MiniApp going into it declares its own native dependencies at its own
//! versions. The resolver aggregates the classified dependencies of all
//! MiniApps and computes a single version per package identity:
//!
//! - APIs and native API implementations tolerate minor/patch drift and
//!   resolve to the highest version; a major difference is a mismatch
//! - Third-party native modules declared in the manifest must match exactly
//! - Third-party native modules unknown to the manifest resolve to their
//!   highest version and never gate resolution
//!
//! File path references carry no version and never take part in version
//! comparison, within a category or across categories. Mismatches are reported in the result, never as an error;
//! callers decide whether a mismatch stops Container generation.

mod conflict;
mod group;
mod plan;
mod tolerance;

pub use conflict::VersionConflict;
pub use group::{group_by_identity, DependencyGroup};
pub use plan::ResolutionResult;
pub use tolerance::{GroupCheck, Tolerance, Verdict};

use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::classify::NativeDependencies;
use crate::package::PackageRef;
use crate::version::NativeVersion;

/// Inter-module message bridge
///
/// Resolved with the API tolerance even though it is declared in the
/// manifest like any third-party native module.
pub const MESSAGE_BRIDGE: &str = "react-native-electrode-bridge";

/// Resolves one version per native dependency across MiniApps
#[derive(Debug, Clone, Default)]
pub struct VersionResolver;

impl VersionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the aggregated native dependencies of several MiniApps
    pub fn resolve(&self, sets: &[NativeDependencies]) -> ResolutionResult {
        let mut apis_and_impls: Vec<&PackageRef> = Vec::new();
        let mut third_party: Vec<&PackageRef> = Vec::new();
        let mut not_in_manifest: Vec<&PackageRef> = Vec::new();

        for set in sets {
            apis_and_impls.extend(&set.apis);
        }
        for set in sets {
            apis_and_impls.extend(&set.native_apis_impl);
            apis_and_impls.extend(set.third_party_in_manifest.iter().filter(|p| is_bridge(p)));
        }
        for set in sets {
            third_party.extend(set.third_party_in_manifest.iter().filter(|p| !is_bridge(p)));
            not_in_manifest.extend(&set.third_party_not_in_manifest);
        }

        let mut result = self.resolve_category(apis_and_impls, Tolerance::MajorOnly);
        result.merge(self.resolve_category(third_party, Tolerance::Exact));

        for group in group_by_identity(not_in_manifest) {
            if result.find(&group.id).is_none() && !result.is_mismatching(&group.id) {
                if let Some(package) = highest_member(&group) {
                    result.resolved.push(package.clone());
                }
            }
            for package in group.members {
                if !result.untracked.contains(&package) {
                    result.untracked.push(package);
                }
            }
        }

        info!(
            "Resolved {} native dependencies, {} with mismatching versions",
            result.resolved.len(),
            result.plugins_with_mismatching_versions.len()
        );
        for package in &result.untracked {
            debug!("{} is not declared in the manifest", package);
        }

        result
    }

    /// Resolve one category of dependencies with the given tolerance
    pub fn resolve_category<'a, I>(&self, packages: I, tolerance: Tolerance) -> ResolutionResult
    where
        I: IntoIterator<Item = &'a PackageRef>,
    {
        let mut result = ResolutionResult::default();

        for group in group_by_identity(packages) {
            let versions = group.distinct_versions();

            if versions.is_empty() {
                // Only file path or unversioned references: nothing to compare
                if let Some(package) = group.canonical_member() {
                    result.resolved.push(package.clone());
                }
                continue;
            }

            match tolerance.check(&versions) {
                Verdict::Resolved(i) => {
                    if let Some(package) = group.member_with_version(versions[i]) {
                        debug!("{} resolved to {}", group.id, versions[i]);
                        result.resolved.push(package.clone());
                    }
                }
                Verdict::Mismatch => {
                    let conflict = VersionConflict {
                        package: group.id.clone(),
                        versions: versions.iter().map(|v| v.to_string()).collect(),
                        tolerance,
                    };
                    warn!("{}", conflict);
                    result
                        .plugins_with_mismatching_versions
                        .push(group.id.to_string());
                    result.conflicts.push(conflict);
                }
            }
        }

        result
    }
}

fn is_bridge(package: &PackageRef) -> bool {
    package.scope().is_none() && package.name() == MESSAGE_BRIDGE
}

/// Highest semantic version of a group, whatever the disagreement
fn highest_member(group: &DependencyGroup) -> Option<&PackageRef> {
    group
        .versioned()
        .filter_map(|p| Some((NativeVersion::parse(p.version()?).ok()?, p)))
        .max_by(|(va, a), (vb, b)| va.cmp(vb).then_with(|| b.to_string().cmp(&a.to_string())))
        .map(|(_, p)| p)
        .or_else(|| group.canonical_member())
}

/// Merge two dependency lists, keeping the highest version of each package
///
/// Versions that are not semantic versions never replace an earlier entry.
pub fn retain_highest_versions(a: &[PackageRef], b: &[PackageRef]) -> Vec<PackageRef> {
    group_by_identity(a.iter().chain(b))
        .into_iter()
        .filter_map(|group| {
            group
                .members
                .into_iter()
                .reduce(|best, candidate| match compare_versions(&candidate, &best) {
                    Ordering::Greater => candidate,
                    _ => best,
                })
        })
        .collect()
}

fn compare_versions(a: &PackageRef, b: &PackageRef) -> Ordering {
    let parse = |p: &PackageRef| p.version().and_then(|v| NativeVersion::parse(v).ok());
    match (parse(a), parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => Ordering::Equal,
    }
}
