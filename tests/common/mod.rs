// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use ern_resolve::{DependencyCategory, NativeDependencies, PackageRef};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn pkg(s: &str) -> PackageRef {
    PackageRef::parse(s).unwrap()
}

pub fn pkgs(specs: &[&str]) -> Vec<PackageRef> {
    specs.iter().map(|s| pkg(s)).collect()
}

/// Build a MiniApp's classified native dependencies
pub fn miniapp(
    apis: &[&str],
    native_apis_impl: &[&str],
    third_party_in_manifest: &[&str],
    third_party_not_in_manifest: &[&str],
) -> NativeDependencies {
    let mut deps = NativeDependencies::new();
    let lists = [
        (DependencyCategory::Api, apis),
        (DependencyCategory::NativeApiImpl, native_apis_impl),
        (DependencyCategory::ThirdPartyInManifest, third_party_in_manifest),
        (DependencyCategory::ThirdPartyNotInManifest, third_party_not_in_manifest),
    ];
    for (category, specs) in lists {
        for spec in specs {
            deps.push(Some(category), pkg(spec));
        }
    }
    deps
}

/// Resolution fixture: three MiniApps sharing APIs, implementations and
/// third-party modules, all within tolerance.
pub fn clean_fixture() -> Vec<NativeDependencies> {
    vec![
        miniapp(
            &["apiOne@1.0.0", "apiTwo@2.0.0"],
            &["apiImplOne@1.0.0"],
            &["nativeModuleOne@1.0.0", "react-native-electrode-bridge@1.5.0"],
            &[],
        ),
        miniapp(
            &["apiOne@1.0.1"],
            &["apiImplOne@1.0.0"],
            &["nativeModuleOne@1.0.0", "nativeModuleTwo@3.0.0"],
            &["unknownModule@0.1.0"],
        ),
        miniapp(
            &["apiTwo@2.1.0"],
            &[],
            &["react-native-electrode-bridge@1.5.3"],
            &[],
        ),
    ]
}

/// Write a package directory with some native code and a package.json
pub fn write_native_package(root: &Path, name: &str, version: &str, module_type: Option<&str>) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("ios")).unwrap();
    fs::write(dir.join("ios/Module.swift"), "").unwrap();

    let ern = match module_type {
        Some(t) => format!(r#", "ern": {{"moduleType": "{}"}}"#, t),
        None => String::new(),
    };
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "{}", "version": "{}"{}}}"#, name, version, ern),
    )
    .unwrap();
}

/// Create a node_modules tree for one MiniApp.
///
/// Returns the TempDir; keep it alive to prevent cleanup.
pub fn setup_node_modules(packages: &[(&str, &str, Option<&str>)]) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let node_modules = temp_dir.path().join("node_modules");
    for (name, version, module_type) in packages {
        write_native_package(&node_modules, name, version, *module_type);
    }
    temp_dir
}

pub const LOCKFILE: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@walmart/cart-miniapp@1.0.0":
  version "1.0.0"
  resolved "https://registry.yarnpkg.com/@walmart/cart-miniapp/-/cart-miniapp-1.0.0.tgz#aaa"
  dependencies:
    apiOne "1.0.0"
    nativeModuleOne "1.0.0"

"@walmart/checkout-miniapp@2.0.0":
  version "2.0.0"
  resolved "https://registry.yarnpkg.com/@walmart/checkout-miniapp/-/checkout-miniapp-2.0.0.tgz#bbb"
  dependencies:
    apiOne "^2.0.0"
    nativeModuleOne "1.0.1"

apiOne@1.0.0:
  version "1.0.0"

apiOne@^2.0.0:
  version "2.0.0"

nativeModuleOne@1.0.0:
  version "1.0.0"

nativeModuleOne@1.0.1:
  version "1.0.1"

left-pad@^1.3.0:
  version "1.3.0"
"#;
