// src/version/mod.rs

//! Version handling for native dependencies
//!
//! Native dependency versions are npm-style semantic versions. Real-world
//! package.json files are not always strict about it, so parsing is lenient:
//! - a leading `v` is stripped (`v1.2.3` → `1.2.3`)
//! - partial versions are padded (`1` → `1.0.0`, `1.2` → `1.2.0`)
//!
//! Anything else (git branches, ranges, tags) is not a semantic version and
//! can only be compared textually.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// A native dependency version: the raw string as declared plus its
/// semantic-version interpretation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeVersion {
    raw: String,
    semver: Version,
}

impl NativeVersion {
    /// Parse a version string
    ///
    /// Examples:
    /// - "1.2.3" → 1.2.3
    /// - "v1.2.3" → 1.2.3
    /// - "1.2" → 1.2.0
    /// - "1.0.0-beta.1" → 1.0.0-beta.1
    pub fn parse(s: &str) -> Result<Self> {
        let semver = to_semver(s).ok_or_else(|| {
            Error::MalformedInput(format!("'{}' is not a semantic version", s))
        })?;
        Ok(Self {
            raw: s.to_string(),
            semver,
        })
    }

    /// The version string as it was declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn semver(&self) -> &Version {
        &self.semver
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    pub fn minor(&self) -> u64 {
        self.semver.minor
    }

    pub fn patch(&self) -> u64 {
        self.semver.patch
    }

    /// Compare two versions
    ///
    /// Semantic ordering first; equal semantic versions spelled differently
    /// (`1.0.0` vs `v1.0.0`) fall back to the raw string so that the order is
    /// total and independent of input order.
    pub fn compare(&self, other: &NativeVersion) -> Ordering {
        match self.semver.cmp(&other.semver) {
            Ordering::Equal => self.raw.cmp(&other.raw),
            ord => ord,
        }
    }
}

impl fmt::Display for NativeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Ord for NativeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for NativeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Strip a leading `v` from a version string
pub fn unprefixed(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Interpret a version string as a semantic version, if possible
pub fn to_semver(s: &str) -> Option<Version> {
    let s = unprefixed(s.trim());
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    // Pad partial numeric versions ("1", "1.2")
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut numbers = [0u64; 3];
    for (i, part) in parts.iter().enumerate() {
        numbers[i] = part.parse::<u64>().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Granularity at which two versions are considered mismatching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchLevel {
    /// Only a major difference is a mismatch
    Major,
    /// A major or minor difference is a mismatch
    Minor,
    /// Any difference in major, minor or patch is a mismatch
    Patch,
}

/// Check whether a set of versions contains a mismatch at the given level
///
/// Compares the lowest and the highest version of the set. Every version
/// must be a semantic version.
pub fn contains_version_mismatch(versions: &[&str], level: MismatchLevel) -> Result<bool> {
    let parsed = versions
        .iter()
        .map(|v| NativeVersion::parse(v))
        .collect::<Result<Vec<_>>>()?;

    let (Some(min), Some(max)) = (parsed.iter().min(), parsed.iter().max()) else {
        return Ok(false);
    };

    let major = min.major() != max.major();
    let minor = min.minor() != max.minor();
    let patch = min.patch() != max.patch();

    Ok(match level {
        MismatchLevel::Major => major,
        MismatchLevel::Minor => major || minor,
        MismatchLevel::Patch => major || minor || patch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAJOR_MISMATCH: &[&str] = &["1.0.0", "2.0.0", "1.0.0"];
    const MINOR_MISMATCH: &[&str] = &["1.0.0", "1.1.0", "1.0.0"];
    const PATCH_MISMATCH: &[&str] = &["1.0.0", "1.0.1", "1.0.0"];
    const NO_MISMATCH: &[&str] = &["1.0.0", "1.0.0", "1.0.0"];

    #[test]
    fn test_parse_simple() {
        let v = NativeVersion::parse("1.2.3").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 3));
        assert_eq!(v.as_str(), "1.2.3");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(NativeVersion::parse("v1.2.3").unwrap().semver(), &Version::new(1, 2, 3));
        assert_eq!(NativeVersion::parse("1.2").unwrap().semver(), &Version::new(1, 2, 0));
        assert_eq!(NativeVersion::parse("3").unwrap().semver(), &Version::new(3, 0, 0));
        // Raw form is kept for display
        assert_eq!(NativeVersion::parse("v1.2.3").unwrap().to_string(), "v1.2.3");
    }

    #[test]
    fn test_parse_rejects_non_semver() {
        assert!(NativeVersion::parse("master").is_err());
        assert!(NativeVersion::parse("^1.0.0").is_err());
        assert!(NativeVersion::parse("1.2.3.4").is_err());
        assert!(NativeVersion::parse("").is_err());
    }

    #[test]
    fn test_compare() {
        let v1 = NativeVersion::parse("1.0.5").unwrap();
        let v2 = NativeVersion::parse("1.1.0").unwrap();
        let pre = NativeVersion::parse("1.1.0-beta.1").unwrap();
        assert!(v1 < v2);
        assert!(pre < v2);
        assert!(v1 < pre);
    }

    #[test]
    fn test_major_level() {
        assert!(contains_version_mismatch(MAJOR_MISMATCH, MismatchLevel::Major).unwrap());
        assert!(!contains_version_mismatch(MINOR_MISMATCH, MismatchLevel::Major).unwrap());
        assert!(!contains_version_mismatch(PATCH_MISMATCH, MismatchLevel::Major).unwrap());
        assert!(!contains_version_mismatch(NO_MISMATCH, MismatchLevel::Major).unwrap());
    }

    #[test]
    fn test_minor_level() {
        assert!(contains_version_mismatch(MAJOR_MISMATCH, MismatchLevel::Minor).unwrap());
        assert!(contains_version_mismatch(MINOR_MISMATCH, MismatchLevel::Minor).unwrap());
        assert!(!contains_version_mismatch(PATCH_MISMATCH, MismatchLevel::Minor).unwrap());
        assert!(!contains_version_mismatch(NO_MISMATCH, MismatchLevel::Minor).unwrap());
    }

    #[test]
    fn test_patch_level() {
        assert!(contains_version_mismatch(MAJOR_MISMATCH, MismatchLevel::Patch).unwrap());
        assert!(contains_version_mismatch(MINOR_MISMATCH, MismatchLevel::Patch).unwrap());
        assert!(contains_version_mismatch(PATCH_MISMATCH, MismatchLevel::Patch).unwrap());
        assert!(!contains_version_mismatch(NO_MISMATCH, MismatchLevel::Patch).unwrap());
    }

    #[test]
    fn test_mismatch_rejects_non_semver() {
        assert!(contains_version_mismatch(&["1.0.0", "develop"], MismatchLevel::Major).is_err());
        assert!(!contains_version_mismatch(&[], MismatchLevel::Patch).unwrap());
    }
}
