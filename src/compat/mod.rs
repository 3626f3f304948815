// src/compat/mod.rs

//! Compatibility checks between two sets of native dependencies
//!
//! The local set is what a MiniApp needs, the remote set is what a native
//! application version (its Container) provides. For every remote dependency
//! also present locally:
//!
//! - same version: compatible
//! - same major, local version lower than remote: compatible (non strict),
//!   the Container provides a backward compatible newer version
//! - anything else: incompatible
//!
//! Remote dependencies unknown to the MiniApp are fine. Local dependencies
//! missing from the remote set only matter for released native application
//! versions, whose binary can no longer change.

mod native_app;

pub use native_app::{native_app_compatibility, NativeAppCompatibility, NativeAppVersion};

use std::fmt;

use tracing::debug;

use crate::package::PackageRef;
use crate::version::to_semver;

/// Version shown for a local dependency absent from the remote set
pub const MISSING: &str = "MISSING";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompatibilityOptions {
    /// Report local dependencies missing from the remote set as incompatible
    pub incompatible_if_remote_missing: bool,
}

/// One compared dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityEntry {
    pub name: String,
    pub scope: Option<String>,
    pub local_version: Option<String>,
    /// Remote version, or [`MISSING`]
    pub remote_version: String,
}

impl CompatibilityEntry {
    fn new(package: &PackageRef, local_version: Option<&str>, remote_version: &str) -> Self {
        Self {
            name: package.name().to_string(),
            scope: package.scope().map(str::to_string),
            local_version: local_version.map(str::to_string),
            remote_version: remote_version.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibilityReport {
    pub compatible: Vec<CompatibilityEntry>,
    pub compatible_non_strict: Vec<CompatibilityEntry>,
    pub incompatible: Vec<CompatibilityEntry>,
}

impl CompatibilityReport {
    pub fn is_compatible(&self) -> bool {
        self.incompatible.is_empty()
    }

    pub fn len(&self) -> usize {
        self.compatible.len() + self.compatible_non_strict.len() + self.incompatible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for CompatibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:<40} {:<16} {:<16} {}",
            "SCOPE", "NAME", "NEEDED VERSION", "LOCAL VERSION", "STATUS"
        )?;
        writeln!(f, "{}", "-".repeat(108))?;

        let rows = [
            (&self.compatible, "compatible"),
            (&self.compatible_non_strict, "non-strict"),
            (&self.incompatible, "INCOMPATIBLE"),
        ];
        for (entries, status) in rows {
            for entry in entries {
                writeln!(
                    f,
                    "{:<20} {:<40} {:<16} {:<16} {}",
                    entry.scope.as_deref().unwrap_or(""),
                    entry.name,
                    entry.remote_version,
                    entry.local_version.as_deref().unwrap_or(""),
                    status
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Compatible,
    NonStrict,
    Incompatible,
}

fn compare(local: &str, remote: &str) -> Verdict {
    if local == remote {
        return Verdict::Compatible;
    }
    match (to_semver(local), to_semver(remote)) {
        (Some(l), Some(r)) if l.major == r.major && l <= r => Verdict::NonStrict,
        _ => Verdict::Incompatible,
    }
}

/// Compare local dependencies against remote ones
pub fn check_compatibility(
    local: &[PackageRef],
    remote: &[PackageRef],
    options: CompatibilityOptions,
) -> CompatibilityReport {
    let mut report = CompatibilityReport::default();

    for remote_dep in remote {
        let Some(remote_version) = remote_dep.version() else {
            continue;
        };
        let Some(local_version) = local
            .iter()
            .find(|l| l.same(remote_dep, true))
            .and_then(|l| l.version())
        else {
            continue;
        };

        let entry = CompatibilityEntry::new(remote_dep, Some(local_version), remote_version);
        let verdict = compare(local_version, remote_version);
        debug!(
            "{}: local {} / remote {} => {:?}",
            remote_dep.id(),
            local_version,
            remote_version,
            verdict
        );
        match verdict {
            Verdict::Compatible => report.compatible.push(entry),
            Verdict::NonStrict => report.compatible_non_strict.push(entry),
            Verdict::Incompatible => report.incompatible.push(entry),
        }
    }

    if options.incompatible_if_remote_missing {
        for local_dep in local {
            let missing = !remote
                .iter()
                .any(|r| r.same(local_dep, true) && r.version().is_some());
            if missing {
                report
                    .incompatible
                    .push(CompatibilityEntry::new(local_dep, local_dep.version(), MISSING));
            }
        }
    }

    report
}
