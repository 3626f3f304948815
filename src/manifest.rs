// src/manifest.rs

//! Manifest lookup boundary
//!
//! The manifest maps native package names to platform-specific build
//! configuration. It decides whether a third-party native module is "known"
//! (declared in the manifest) and whether a resolved dependency gets injected
//! into a given platform's Container.
//!
//! The real manifest lives in a git repository and is fetched elsewhere; this
//! module only defines the lookup contract plus an in-memory implementation
//! that can be loaded from a TOML file:
//!
//! ```toml
//! [[plugin]]
//! package = "react-native-code-push@5.0.0"
//! android = { dependencies = ["com.microsoft.codepush:1.0"] }
//! ios = { pbxproj = true }
//!
//! [[plugin]]
//! package = "react-native-maps"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::descriptor::NativePlatform;
use crate::error::Result;
use crate::package::{PackageId, PackageRef};

/// Platform-specific plugin configuration for a native dependency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub android: Option<serde_json::Value>,
    #[serde(default)]
    pub ios: Option<serde_json::Value>,
}

impl PluginConfig {
    pub fn for_platform(&self, platform: NativePlatform) -> Option<&serde_json::Value> {
        match platform {
            NativePlatform::Android => self.android.as_ref(),
            NativePlatform::Ios => self.ios.as_ref(),
        }
    }
}

/// Read-only lookup into the native dependency manifest
pub trait ManifestLookup {
    /// Plugin configuration of a dependency for one platform
    ///
    /// Returns `None` when the manifest has no configuration for that
    /// platform, which means the dependency is not injected there.
    fn plugin_config(
        &self,
        package: &PackageRef,
        platform: NativePlatform,
    ) -> Result<Option<PluginConfig>>;

    /// The manifest entry declaring this native dependency, if any
    fn native_dependency(&self, package: &PackageRef) -> Result<Option<PackageRef>>;
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestFile {
    #[serde(default, rename = "plugin")]
    plugins: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    package: String,
    #[serde(default)]
    android: Option<toml::Value>,
    #[serde(default)]
    ios: Option<toml::Value>,
}

/// In-memory manifest keyed by package identity
#[derive(Debug, Clone, Default)]
pub struct StaticManifest {
    entries: HashMap<PackageId, (PackageRef, PluginConfig)>,
}

impl StaticManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a native dependency with its plugin configuration
    pub fn insert(&mut self, package: PackageRef, config: PluginConfig) {
        self.entries.insert(package.id().clone(), (package, config));
    }

    pub fn with_plugin(mut self, package: PackageRef, config: PluginConfig) -> Self {
        self.insert(package, config);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a manifest from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(content)?;
        let mut manifest = Self::new();
        for entry in file.plugins {
            let package = PackageRef::parse(&entry.package)?;
            let config = PluginConfig {
                android: entry.android.map(toml_to_json).transpose()?,
                ios: entry.ios.map(toml_to_json).transpose()?,
            };
            manifest.insert(package, config);
        }
        debug!("Loaded manifest with {} plugin(s)", manifest.len());
        Ok(manifest)
    }
}

fn toml_to_json(value: toml::Value) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

impl ManifestLookup for StaticManifest {
    fn plugin_config(
        &self,
        package: &PackageRef,
        platform: NativePlatform,
    ) -> Result<Option<PluginConfig>> {
        Ok(self
            .entries
            .get(package.id())
            .filter(|(_, config)| config.for_platform(platform).is_some())
            .map(|(_, config)| config.clone()))
    }

    fn native_dependency(&self, package: &PackageRef) -> Result<Option<PackageRef>> {
        Ok(self.entries.get(package.id()).map(|(p, _)| p.clone()))
    }
}
