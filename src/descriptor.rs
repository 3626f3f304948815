// src/descriptor.rs

//! Native application descriptors
//!
//! A native application is addressed as `name:platform:version`, e.g.
//! `MyNativeApp:android:1.2.3`. Partial forms (`name`, `name:platform`) address
//! every platform or every version of an application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Target native platform of a Container
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NativePlatform {
    Android,
    Ios,
}

impl NativePlatform {
    pub fn all() -> &'static [NativePlatform] {
        &[Self::Android, Self::Ios]
    }
}

/// Errors that can occur when parsing a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorParseError {
    #[error("empty application name in '{0}'")]
    EmptyName(String),
    #[error("unsupported platform '{platform}' in '{input}' (expected android or ios)")]
    UnknownPlatform { input: String, platform: String },
    #[error("empty version in '{0}'")]
    EmptyVersion(String),
    #[error("too many ':' separated parts in '{0}'")]
    TooManyParts(String),
    #[error("'{0}' is not a complete name:platform:version descriptor")]
    Incomplete(String),
}

/// A possibly partial native application descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppDescriptor {
    pub name: String,
    pub platform: Option<NativePlatform>,
    pub version: Option<String>,
}

impl AppDescriptor {
    /// Parse `name`, `name:platform` or `name:platform:version`
    pub fn parse(s: &str) -> Result<Self, DescriptorParseError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(DescriptorParseError::TooManyParts(s.to_string()));
        }

        let name = parts[0];
        if name.is_empty() {
            return Err(DescriptorParseError::EmptyName(s.to_string()));
        }

        let platform = match parts.get(1) {
            Some(p) => Some(NativePlatform::from_str(p).map_err(|_| {
                DescriptorParseError::UnknownPlatform {
                    input: s.to_string(),
                    platform: p.to_string(),
                }
            })?),
            None => None,
        };

        let version = match parts.get(2) {
            Some(v) if v.is_empty() => {
                return Err(DescriptorParseError::EmptyVersion(s.to_string()));
            }
            Some(v) => Some(v.to_string()),
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            platform,
            version,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.platform.is_some() && self.version.is_some()
    }

    /// Whether `other` is addressed by this (possibly partial) descriptor
    pub fn matches(&self, other: &AppVersionDescriptor) -> bool {
        self.name == other.name
            && self.platform.is_none_or(|p| p == other.platform)
            && self.version.as_ref().is_none_or(|v| *v == other.version)
    }
}

impl fmt::Display for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(platform) = self.platform {
            write!(f, ":{}", platform)?;
            if let Some(ref version) = self.version {
                write!(f, ":{}", version)?;
            }
        }
        Ok(())
    }
}

impl FromStr for AppDescriptor {
    type Err = DescriptorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppDescriptor::parse(s)
    }
}

/// A complete `name:platform:version` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppVersionDescriptor {
    pub name: String,
    pub platform: NativePlatform,
    pub version: String,
}

impl AppVersionDescriptor {
    pub fn new(name: impl Into<String>, platform: NativePlatform, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform,
            version: version.into(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, DescriptorParseError> {
        let descriptor = AppDescriptor::parse(s)?;
        match descriptor {
            AppDescriptor {
                name,
                platform: Some(platform),
                version: Some(version),
            } => Ok(Self {
                name,
                platform,
                version,
            }),
            _ => Err(DescriptorParseError::Incomplete(s.to_string())),
        }
    }
}

impl fmt::Display for AppVersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.platform, self.version)
    }
}

impl FromStr for AppVersionDescriptor {
    type Err = DescriptorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppVersionDescriptor::parse(s)
    }
}
