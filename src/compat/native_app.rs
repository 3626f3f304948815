// src/compat/native_app.rs

//! MiniApp compatibility against native application versions

use tracing::info;

use super::{check_compatibility, CompatibilityOptions, CompatibilityReport};
use crate::classify::NativeDependencies;
use crate::descriptor::{AppDescriptor, AppVersionDescriptor};
use crate::package::PackageRef;

/// A native application version and the native dependencies of its Container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAppVersion {
    pub descriptor: AppVersionDescriptor,
    /// Released versions have a shipped binary that cannot gain dependencies
    pub is_released: bool,
    pub dependencies: Vec<PackageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAppCompatibility {
    pub descriptor: AppVersionDescriptor,
    pub is_released: bool,
    pub is_compatible: bool,
    pub report: CompatibilityReport,
}

/// Check a MiniApp's native dependencies against native application versions
///
/// Only the application versions matching `filter` are checked. Third-party
/// modules unknown to the manifest are not compared.
pub fn native_app_compatibility(
    miniapp: &NativeDependencies,
    apps: &[NativeAppVersion],
    filter: Option<&AppDescriptor>,
) -> Vec<NativeAppCompatibility> {
    let local = miniapp.gating();

    apps.iter()
        .filter(|app| filter.is_none_or(|f| f.matches(&app.descriptor)))
        .map(|app| {
            let report = check_compatibility(
                &local,
                &app.dependencies,
                CompatibilityOptions {
                    incompatible_if_remote_missing: app.is_released,
                },
            );
            let is_compatible = report.is_compatible();
            info!(
                "{} : {}",
                app.descriptor,
                if is_compatible { "COMPATIBLE" } else { "NOT COMPATIBLE" }
            );
            NativeAppCompatibility {
                descriptor: app.descriptor.clone(),
                is_released: app.is_released,
                is_compatible,
                report,
            }
        })
        .collect()
}
