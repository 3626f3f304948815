// src/classify/mod.rs

//! Native dependency classification
//!
//! Every native package found in a MiniApp's (or Composite's) installed
//! package tree falls into exactly one category:
//!
//! - **APIs**: packages whose `ern.moduleType` is `ern-api`, or whose name
//!   follows the `react-native-<name>-api` convention
//! - **Native API implementations**: `ern.moduleType` is `ern-native-api-impl`
//! - **Third-party in manifest**: no `ern` metadata, declared in the manifest
//! - **Third-party not in manifest**: no `ern` metadata, unknown to the manifest
//!
//! Packages with `ern` metadata of another module type (JS API
//! implementations, MiniApps) are only listed in `all`.

mod discovery;

pub use discovery::{
    discover_packages, filter_directories, find_native_code_files, resolve_package_paths,
    ErnMetadata, PackageJson,
};

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, info};

use crate::error::Result;
use crate::manifest::ManifestLookup;
use crate::package::PackageRef;

static API_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^react-native-.+-api$").unwrap());

/// Electrode Native module types, as declared in `package.json` `ern.moduleType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum ModuleType {
    #[strum(serialize = "ern-api")]
    Api,
    #[strum(serialize = "ern-js-api-impl")]
    JsApiImpl,
    #[strum(serialize = "ern-native-api-impl")]
    NativeApiImpl,
    #[strum(serialize = "ern-miniapp")]
    MiniApp,
}

/// The category a native dependency is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyCategory {
    Api,
    NativeApiImpl,
    ThirdPartyInManifest,
    ThirdPartyNotInManifest,
}

impl DependencyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::NativeApiImpl => "native-api-impl",
            Self::ThirdPartyInManifest => "third-party",
            Self::ThirdPartyNotInManifest => "third-party-not-in-manifest",
        }
    }

    pub fn all() -> &'static [DependencyCategory] {
        &[
            Self::Api,
            Self::NativeApiImpl,
            Self::ThirdPartyInManifest,
            Self::ThirdPartyNotInManifest,
        ]
    }
}

impl std::fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The classified native dependencies of one MiniApp or Composite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeDependencies {
    pub all: Vec<PackageRef>,
    pub apis: Vec<PackageRef>,
    pub native_apis_impl: Vec<PackageRef>,
    pub third_party_in_manifest: Vec<PackageRef>,
    pub third_party_not_in_manifest: Vec<PackageRef>,
}

impl NativeDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dependency in `all` and in its category
    pub fn push(&mut self, category: Option<DependencyCategory>, package: PackageRef) {
        if let Some(category) = category {
            self.category_mut(category).push(package.clone());
        }
        self.all.push(package);
    }

    pub fn category(&self, category: DependencyCategory) -> &[PackageRef] {
        match category {
            DependencyCategory::Api => &self.apis,
            DependencyCategory::NativeApiImpl => &self.native_apis_impl,
            DependencyCategory::ThirdPartyInManifest => &self.third_party_in_manifest,
            DependencyCategory::ThirdPartyNotInManifest => &self.third_party_not_in_manifest,
        }
    }

    fn category_mut(&mut self, category: DependencyCategory) -> &mut Vec<PackageRef> {
        match category {
            DependencyCategory::Api => &mut self.apis,
            DependencyCategory::NativeApiImpl => &mut self.native_apis_impl,
            DependencyCategory::ThirdPartyInManifest => &mut self.third_party_in_manifest,
            DependencyCategory::ThirdPartyNotInManifest => &mut self.third_party_not_in_manifest,
        }
    }

    /// Find the category a package was classified into
    pub fn category_of(&self, package: &PackageRef) -> Option<DependencyCategory> {
        DependencyCategory::all()
            .iter()
            .copied()
            .find(|c| self.category(*c).iter().any(|p| p == package))
    }

    /// Append another set (e.g. a second scanned directory)
    pub fn extend(&mut self, other: NativeDependencies) {
        self.all.extend(other.all);
        self.apis.extend(other.apis);
        self.native_apis_impl.extend(other.native_apis_impl);
        self.third_party_in_manifest.extend(other.third_party_in_manifest);
        self.third_party_not_in_manifest
            .extend(other.third_party_not_in_manifest);
    }

    /// Keep only the packages matching `keep`, in every list
    pub fn retain(&mut self, mut keep: impl FnMut(&PackageRef) -> bool) {
        self.all.retain(&mut keep);
        self.apis.retain(&mut keep);
        self.native_apis_impl.retain(&mut keep);
        self.third_party_in_manifest.retain(&mut keep);
        self.third_party_not_in_manifest.retain(&mut keep);
    }

    /// Dependencies used for compatibility checks: everything but the
    /// third-party modules unknown to the manifest
    pub fn gating(&self) -> Vec<PackageRef> {
        self.apis
            .iter()
            .chain(&self.native_apis_impl)
            .chain(&self.third_party_in_manifest)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// A native package found in a package tree, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
    pub package: PackageRef,
    /// Whether the package.json carries an `ern` section
    pub has_ern_metadata: bool,
    pub module_type: Option<ModuleType>,
}

impl DiscoveredPackage {
    /// A package without `ern` metadata (a third-party native module)
    pub fn third_party(package: PackageRef) -> Self {
        Self {
            package,
            has_ern_metadata: false,
            module_type: None,
        }
    }

    pub fn ern(package: PackageRef, module_type: ModuleType) -> Self {
        Self {
            package,
            has_ern_metadata: true,
            module_type: Some(module_type),
        }
    }
}

/// Buckets discovered native packages into dependency categories
pub struct DependencyClassifier<'a, M: ManifestLookup + ?Sized> {
    manifest: &'a M,
}

impl<'a, M: ManifestLookup + ?Sized> DependencyClassifier<'a, M> {
    pub fn new(manifest: &'a M) -> Self {
        Self { manifest }
    }

    /// Classify a single package
    ///
    /// Returns `None` for packages with `ern` metadata that are neither an API
    /// nor a native API implementation.
    pub fn classify_one(&self, discovered: &DiscoveredPackage) -> Result<Option<DependencyCategory>> {
        let package = &discovered.package;

        if discovered.has_ern_metadata {
            if discovered.module_type == Some(ModuleType::Api)
                || API_NAME_RE.is_match(package.name())
            {
                return Ok(Some(DependencyCategory::Api));
            }
            if discovered.module_type == Some(ModuleType::NativeApiImpl) {
                return Ok(Some(DependencyCategory::NativeApiImpl));
            }
            return Ok(None);
        }

        if self.manifest.native_dependency(package)?.is_some() {
            Ok(Some(DependencyCategory::ThirdPartyInManifest))
        } else {
            Ok(Some(DependencyCategory::ThirdPartyNotInManifest))
        }
    }

    /// Classify a set of discovered packages
    pub fn classify<I>(&self, packages: I) -> Result<NativeDependencies>
    where
        I: IntoIterator<Item = DiscoveredPackage>,
    {
        let mut result = NativeDependencies::new();
        for discovered in packages {
            let category = self.classify_one(&discovered)?;
            debug!(
                "Classified {} as {}",
                discovered.package,
                category.map_or("other", |c| c.as_str())
            );
            result.push(category, discovered.package);
        }
        Ok(result)
    }

    /// Discover and classify the native packages installed below each root
    pub fn scan(&self, roots: &[PathBuf]) -> Result<NativeDependencies> {
        let mut result = NativeDependencies::new();
        for root in roots {
            let discovered = discover_packages(root)?;
            result.extend(self.classify(discovered.into_iter().map(|(_, d)| d))?);
        }
        info!(
            "Classified {} native dependencies ({} APIs, {} API impls, {} in manifest, {} not in manifest)",
            result.all.len(),
            result.apis.len(),
            result.native_apis_impl.len(),
            result.third_party_in_manifest.len(),
            result.third_party_not_in_manifest.len()
        );
        Ok(result)
    }
}
