// src/classify/discovery.rs

//! Native package discovery on disk
//!
//! A package "has native code" when its directory contains Swift, Java,
//! Xcode project or framework files. Discovery walks an installed package
//! tree (a Composite's `node_modules`), maps every native file back to the
//! package directory owning it, and reads that package's `package.json`.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{DiscoveredPackage, ModuleType};
use crate::error::Result;
use crate::package::PackageRef;

static NATIVE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.swift$|\.pbxproj$|\.java$|\.framework/").unwrap());

static IGNORED_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sample|demo|example|appium|safari-launcher").unwrap());

/// Container framework shipped inside some packages; never a dependency
const CONTAINER_FRAMEWORK: &str = "ElectrodeContainer.framework";

const NODE_MODULES: &str = "node_modules";

/// The subset of package.json needed for classification
#[derive(Debug, Clone, Deserialize)]
pub struct PackageJson {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub ern: Option<ErnMetadata>,
}

/// The `ern` section of a package.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErnMetadata {
    #[serde(default)]
    pub module_type: Option<String>,
}

impl PackageJson {
    pub fn read(package_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(package_dir.join("package.json"))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Registry reference `name@version` for this package
    pub fn package_ref(&self) -> Result<PackageRef> {
        let spec = match &self.version {
            Some(version) => format!("{}@{}", self.name, version),
            None => self.name.clone(),
        };
        Ok(PackageRef::parse(&spec)?)
    }

    pub fn into_discovered(self) -> Result<DiscoveredPackage> {
        let package = self.package_ref()?;
        let module_type = self
            .ern
            .as_ref()
            .and_then(|ern| ern.module_type.as_deref())
            .and_then(|t| ModuleType::from_str(t).ok());
        Ok(DiscoveredPackage {
            package,
            has_ern_metadata: self.ern.is_some(),
            module_type,
        })
    }
}

/// Find files containing native code below `root`
///
/// Paths are returned relative to `root`, using `/` as separator.
pub fn find_native_code_files(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .filter(|p| NATIVE_CODE_RE.is_match(p))
        .filter(|p| !p.contains(CONTAINER_FRAMEWORK))
        .collect()
}

/// Drop sample, demo and test-harness directories
pub fn filter_directories(paths: Vec<String>) -> Vec<String> {
    paths
        .into_iter()
        .filter(|p| !IGNORED_DIR_RE.is_match(p))
        .collect()
}

/// Map native code file paths to the package directories owning them
///
/// - `pkg-native/src/code.swift` → `pkg-native`
/// - `@scope/pkg-native/src/code.swift` → `@scope/pkg-native`
/// - `a/node_modules/pkg-native/src/code.swift` → `a/node_modules/pkg-native`
/// - `a/node_modules/@scope/pkg/src/code.swift` → `a/node_modules/@scope/pkg`
///
/// Order of first appearance is kept; duplicates are dropped.
pub fn resolve_package_paths(paths: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for path in paths {
        let (prefix, rest) = match path.rfind(NODE_MODULES) {
            Some(idx) => {
                let split = (idx + NODE_MODULES.len() + 1).min(path.len());
                (&path[..split], &path[split..])
            }
            None => ("", path.as_str()),
        };

        let segments: Vec<&str> = rest.split('/').collect();
        let package = if rest.starts_with('@') && segments.len() > 1 {
            format!("{}{}/{}", prefix, segments[0], segments[1])
        } else {
            format!("{}{}", prefix, segments[0])
        };

        if seen.insert(package.clone()) {
            result.push(package);
        }
    }

    result
}

/// Discover every native package installed below `root`
///
/// Package directories whose package.json is unreadable or names an invalid
/// package are skipped with a warning; native code outside a package is not a dependency.
pub fn discover_packages(root: &Path) -> Result<Vec<(PathBuf, DiscoveredPackage)>> {
    let files = filter_directories(find_native_code_files(root));
    let package_dirs = resolve_package_paths(&files);
    debug!(
        "Found {} native file(s) in {} package(s) under {}",
        files.len(),
        package_dirs.len(),
        root.display()
    );

    let mut result = Vec::new();
    for dir in package_dirs {
        let package_dir = root.join(&dir);
        let discovered = PackageJson::read(&package_dir).and_then(PackageJson::into_discovered);
        match discovered {
            Ok(package) => result.push((package_dir, package)),
            Err(e) => warn!("Skipping {}: {}", package_dir.display(), e),
        }
    }

    Ok(result)
}
