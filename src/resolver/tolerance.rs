// src/resolver/tolerance.rs

//! Per-category mismatch tolerance
//!
//! Each tolerance maps to a group check: given the distinct version strings of
//! one package identity, either pick the version the group resolves to or
//! declare a mismatch.

use tracing::warn;

use crate::version::NativeVersion;

/// How much version drift a dependency category tolerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tolerance {
    /// Minor and patch drift is fine, the highest version wins.
    /// Used for APIs and native API implementations.
    MajorOnly,
    /// Only identical version strings are compatible.
    /// Used for third-party native modules declared in the manifest.
    Exact,
}

/// Outcome of checking one group of versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The group resolves to the version at this index
    Resolved(usize),
    /// At least two versions disagree beyond the tolerance
    Mismatch,
}

/// Checks the distinct versions of one package identity
pub type GroupCheck = fn(&[&str]) -> Verdict;

const TOLERANCE_TABLE: &[(Tolerance, GroupCheck)] = &[
    (Tolerance::MajorOnly, check_major_only),
    (Tolerance::Exact, check_exact),
];

impl Tolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MajorOnly => "major",
            Self::Exact => "exact",
        }
    }

    /// The group check implementing this tolerance
    pub fn group_check(self) -> GroupCheck {
        TOLERANCE_TABLE
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, check)| *check)
            .unwrap_or(check_exact)
    }

    /// Check a group of distinct version strings
    pub fn check(self, versions: &[&str]) -> Verdict {
        match versions {
            [] | [_] => Verdict::Resolved(0),
            _ => (self.group_check())(versions),
        }
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn check_exact(versions: &[&str]) -> Verdict {
    if versions.iter().all(|v| *v == versions[0]) {
        Verdict::Resolved(0)
    } else {
        Verdict::Mismatch
    }
}

fn check_major_only(versions: &[&str]) -> Verdict {
    let mut parsed = Vec::with_capacity(versions.len());
    for v in versions {
        match NativeVersion::parse(v) {
            Ok(version) => parsed.push(version),
            Err(_) => {
                // Differing non-semantic versions (git refs) cannot be ordered
                warn!("Cannot compare version '{}' semantically", v);
                return Verdict::Mismatch;
            }
        }
    }

    let major = parsed[0].major();
    if parsed.iter().any(|v| v.major() != major) {
        return Verdict::Mismatch;
    }

    parsed
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(Verdict::Mismatch, |(i, _)| Verdict::Resolved(i))
}
