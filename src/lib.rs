// src/lib.rs

//! Native dependency version reconciliation for MiniApp Containers
//!
//! A Container is the native application shell embedding several
//! independently versioned JavaScript MiniApps. It can only ship one version
//! of each native dependency, so the native dependencies of all its MiniApps
//! must be reconciled before it is generated.
//!
//! # Pipeline
//!
//! - Classification: native packages found in a MiniApp's package tree are
//!   bucketed into APIs, API implementations and third-party modules
//! - Resolution: one version per package identity, with a per-category
//!   mismatch tolerance
//! - Compatibility: a MiniApp checked against the native dependencies of
//!   existing native application versions
//! - Diagnostics: yarn lockfile dependency trees explaining who pulls in
//!   each conflicting version

pub mod classify;
pub mod compat;
pub mod composite;
pub mod config;
pub mod descriptor;
mod error;
pub mod lockfile;
pub mod manifest;
pub mod package;
pub mod resolver;
pub mod version;

pub use classify::{
    DependencyCategory, DependencyClassifier, DiscoveredPackage, ModuleType, NativeDependencies,
};
pub use compat::{
    check_compatibility, native_app_compatibility, CompatibilityEntry, CompatibilityOptions,
    CompatibilityReport, NativeAppCompatibility, NativeAppVersion,
};
pub use composite::Composite;
pub use descriptor::{AppDescriptor, AppVersionDescriptor, DescriptorParseError, NativePlatform};
pub use error::{Error, Result};
pub use lockfile::{
    build_dependency_tree, ensure_orphaned, is_orphaned, mismatch_report, DependencyTree,
    LockfileError, YarnLock,
};
pub use manifest::{ManifestLookup, PluginConfig, StaticManifest};
pub use package::{PackageId, PackageRef, ParseError, SourceKind};
pub use resolver::{
    retain_highest_versions, ResolutionResult, Tolerance, VersionConflict, VersionResolver,
};
pub use version::{contains_version_mismatch, MismatchLevel, NativeVersion};
