// src/composite.rs

//! Composite: the JavaScript project combining every MiniApp of a Container
//!
//! Scanning a Composite's installed packages for native code is the slow
//! part of resolution, so each Composite scans at most once and keeps the
//! classified native dependencies for its whole lifetime.

use std::path::PathBuf;
use std::slice;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::classify::{DependencyClassifier, NativeDependencies};
use crate::descriptor::NativePlatform;
use crate::error::Result;
use crate::manifest::ManifestLookup;
use crate::package::{PackageId, PackageRef};
use crate::resolver::{ResolutionResult, VersionResolver};

/// Always injected, regardless of manifest configuration
pub const REACT_NATIVE: &str = "react-native";

pub struct Composite<M: ManifestLookup> {
    miniapps: Vec<PackageRef>,
    /// Directories scanned for native packages (`node_modules` folders)
    roots: Vec<PathBuf>,
    manifest: M,
    native_dependencies: OnceLock<NativeDependencies>,
}

impl<M: ManifestLookup> Composite<M> {
    pub fn new(miniapps: Vec<PackageRef>, roots: Vec<PathBuf>, manifest: M) -> Self {
        Self {
            miniapps,
            roots,
            manifest,
            native_dependencies: OnceLock::new(),
        }
    }

    /// A Composite whose native dependencies were classified elsewhere
    pub fn from_classified(
        miniapps: Vec<PackageRef>,
        native_dependencies: NativeDependencies,
        manifest: M,
    ) -> Self {
        Self {
            miniapps,
            roots: Vec::new(),
            manifest,
            native_dependencies: OnceLock::from(native_dependencies),
        }
    }

    pub fn miniapps(&self) -> &[PackageRef] {
        &self.miniapps
    }

    pub fn manifest(&self) -> &M {
        &self.manifest
    }

    /// Native dependencies of every MiniApp, scanned on first access
    ///
    /// MiniApps carrying native code of their own are not dependencies and
    /// are left out.
    pub fn native_dependencies(&self) -> Result<&NativeDependencies> {
        if let Some(cached) = self.native_dependencies.get() {
            return Ok(cached);
        }

        let classifier = DependencyClassifier::new(&self.manifest);
        let mut scanned = classifier.scan(&self.roots)?;

        let miniapp_ids: Vec<&PackageId> = self.miniapps.iter().map(|m| m.id()).collect();
        scanned.retain(|p| !miniapp_ids.contains(&p.id()));
        info!(
            "Composite of {} MiniApp(s) has {} native dependencies",
            self.miniapps.len(),
            scanned.all.len()
        );

        Ok(self.native_dependencies.get_or_init(|| scanned))
    }

    pub fn resolved_native_dependencies(&self) -> Result<ResolutionResult> {
        let dependencies = self.native_dependencies()?;
        Ok(VersionResolver::new().resolve(slice::from_ref(dependencies)))
    }

    /// Resolved native dependencies to inject into a Container for `platform`
    ///
    /// A dependency is injected when the manifest has a plugin configuration
    /// for that platform. React Native itself is always injected. Mismatching
    /// dependencies are not resolved and never injected.
    pub fn injectable_native_dependencies(&self, platform: NativePlatform) -> Result<Vec<PackageRef>> {
        let resolution = self.resolved_native_dependencies()?;
        let mut result = Vec::new();

        for dependency in resolution.resolved {
            if dependency.scope().is_none() && dependency.name() == REACT_NATIVE {
                result.push(dependency);
                continue;
            }
            if self.manifest.plugin_config(&dependency, platform)?.is_some() {
                result.push(dependency);
            } else {
                debug!("{} has no {} plugin configuration", dependency, platform);
            }
        }

        Ok(result)
    }
}
