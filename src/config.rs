// src/config.rs

//! Input files for resolution and compatibility checks
//!
//! Container input, one table per MiniApp with its classified native
//! dependencies:
//!
//! ```toml
//! [[miniapp]]
//! name = "cart-miniapp"
//! apis = ["react-native-cart-api@1.0.0"]
//! native_apis_impl = []
//! third_party_in_manifest = ["react-native-maps@0.20.0"]
//! third_party_not_in_manifest = []
//! ```
//!
//! Compatibility input, a MiniApp checked against native application
//! versions:
//!
//! ```toml
//! [miniapp]
//! name = "cart-miniapp"
//! apis = ["react-native-cart-api@1.0.0"]
//!
//! [[native_app]]
//! descriptor = "walmart:android:17.0.0"
//! released = true
//! dependencies = ["react-native-cart-api@1.2.0"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::{DependencyCategory, NativeDependencies};
use crate::compat::NativeAppVersion;
use crate::descriptor::AppVersionDescriptor;
use crate::error::Result;
use crate::package::PackageRef;

/// Native dependencies of one MiniApp, per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiniAppInput {
    pub name: String,
    #[serde(default)]
    pub apis: Vec<String>,
    #[serde(default)]
    pub native_apis_impl: Vec<String>,
    #[serde(default)]
    pub third_party_in_manifest: Vec<String>,
    #[serde(default)]
    pub third_party_not_in_manifest: Vec<String>,
}

impl MiniAppInput {
    /// Parse every package reference into a classified set
    pub fn native_dependencies(&self) -> Result<NativeDependencies> {
        let lists = [
            (DependencyCategory::Api, &self.apis),
            (DependencyCategory::NativeApiImpl, &self.native_apis_impl),
            (DependencyCategory::ThirdPartyInManifest, &self.third_party_in_manifest),
            (
                DependencyCategory::ThirdPartyNotInManifest,
                &self.third_party_not_in_manifest,
            ),
        ];

        let mut deps = NativeDependencies::new();
        for (category, specs) in lists {
            for spec in specs {
                deps.push(Some(category), PackageRef::parse(spec)?);
            }
        }
        Ok(deps)
    }
}

/// The MiniApps going into one Container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerInput {
    #[serde(default)]
    pub miniapp: Vec<MiniAppInput>,
}

impl ContainerInput {
    pub fn native_dependencies(&self) -> Result<Vec<NativeDependencies>> {
        self.miniapp.iter().map(|m| m.native_dependencies()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeAppInput {
    pub descriptor: String,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl NativeAppInput {
    pub fn to_native_app_version(&self) -> Result<NativeAppVersion> {
        Ok(NativeAppVersion {
            descriptor: AppVersionDescriptor::parse(&self.descriptor)?,
            is_released: self.released,
            dependencies: self
                .dependencies
                .iter()
                .map(|d| PackageRef::parse(d))
                .collect::<std::result::Result<_, _>>()?,
        })
    }
}

/// A MiniApp and the native application versions to check it against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatInput {
    pub miniapp: MiniAppInput,
    #[serde(default)]
    pub native_app: Vec<NativeAppInput>,
}

impl CompatInput {
    pub fn native_apps(&self) -> Result<Vec<NativeAppVersion>> {
        self.native_app
            .iter()
            .map(|a| a.to_native_app_version())
            .collect()
    }
}

pub fn parse_container_file(path: &Path) -> Result<ContainerInput> {
    let content = std::fs::read_to_string(path)?;
    parse_container_string(&content)
}

pub fn parse_container_string(content: &str) -> Result<ContainerInput> {
    Ok(toml::from_str(content)?)
}

pub fn parse_compat_file(path: &Path) -> Result<CompatInput> {
    let content = std::fs::read_to_string(path)?;
    parse_compat_string(&content)
}

pub fn parse_compat_string(content: &str) -> Result<CompatInput> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NativePlatform;
    use crate::error::Error;

    #[test]
    fn test_parse_container() {
        let input = parse_container_string(
            r#"
[[miniapp]]
name = "cart"
apis = ["react-native-cart-api@1.0.0"]
third_party_in_manifest = ["react-native-maps@0.20.0"]

[[miniapp]]
name = "checkout"
native_apis_impl = ["react-native-cart-api-impl@1.0.0"]
third_party_not_in_manifest = ["@scope/native-thing@2.0.0"]
"#,
        )
        .unwrap();

        assert_eq!(input.miniapp.len(), 2);
        let sets = input.native_dependencies().unwrap();
        assert_eq!(sets[0].apis.len(), 1);
        assert_eq!(sets[0].third_party_in_manifest.len(), 1);
        assert_eq!(sets[0].all.len(), 2);
        assert_eq!(sets[1].native_apis_impl.len(), 1);
        assert_eq!(sets[1].third_party_not_in_manifest[0].scope(), Some("scope"));
    }

    #[test]
    fn test_invalid_reference() {
        let input = parse_container_string("[[miniapp]]\nname = \"a\"\napis = [\"@scope\"]\n").unwrap();
        assert!(matches!(input.native_dependencies(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_compat() {
        let input = parse_compat_string(
            r#"
[miniapp]
name = "cart"
apis = ["react-native-cart-api@1.0.0"]

[[native_app]]
descriptor = "walmart:android:17.0.0"
released = true
dependencies = ["react-native-cart-api@1.2.0"]

[[native_app]]
descriptor = "walmart:ios:17.1.0"
"#,
        )
        .unwrap();

        let apps = input.native_apps().unwrap();
        assert_eq!(apps.len(), 2);
        assert!(apps[0].is_released);
        assert_eq!(apps[0].descriptor.platform, NativePlatform::Android);
        assert!(!apps[1].is_released);
        assert!(apps[1].dependencies.is_empty());
    }

    #[test]
    fn test_incomplete_descriptor() {
        let input = parse_compat_string(
            "[miniapp]\nname = \"cart\"\n\n[[native_app]]\ndescriptor = \"walmart:android\"\n",
        )
        .unwrap();
        assert!(matches!(input.native_apps(), Err(Error::Descriptor(_))));
    }
}
