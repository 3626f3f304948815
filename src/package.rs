// src/package.rs

//! Package references
//!
//! A package reference names a JavaScript package that may carry native code,
//! in one of three syntaxes:
//!
//! - Registry: `name`, `name@1.2.3`, `@scope/name@^1.0.0`
//! - File path: `file:../my-module`, `/abs/path/my-module`, `C:\path\my-module`
//! - Git: `git+ssh://git@host:org/repo.git#v1.0.0`, `https://host/org/repo.git`
//!
//! Identity is `(scope, name)`. The version is left out of
//! [`PackageId`] so that references to different versions of the same package
//! group together during resolution.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static WINDOWS_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]:\\").unwrap());

const GIT_PREFIXES: &[&str] = &["git+ssh://", "git+https://", "git://", "https://"];

/// Where a package reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Package registry (npm-style `name@version`)
    Registry,
    /// Git repository, optionally pinned to a branch/tag/commit
    Git,
    /// Local file system path
    FilePath,
}

/// Identity of a package: optional scope plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    pub scope: Option<String>,
    pub name: String,
}

impl PackageId {
    pub fn new(scope: Option<String>, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Errors that can occur when parsing a package reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty package reference")]
    Empty,
    #[error("empty package name in '{0}'")]
    EmptyName(String),
    #[error("invalid package name in '{0}'")]
    InvalidName(String),
    #[error("empty scope in '{0}'")]
    EmptyScope(String),
    #[error("scoped package without a name in '{0}'")]
    MissingScopedName(String),
    #[error("empty version after '@' in '{0}'")]
    EmptyVersion(String),
    #[error("empty path in '{0}'")]
    EmptyPath(String),
    #[error("git url must end with .git in '{0}'")]
    InvalidGitUrl(String),
    #[error("empty git reference after '#' in '{0}'")]
    EmptyGitRef(String),
}

/// An immutable reference to a package, optionally versioned
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    id: PackageId,
    version: Option<String>,
    source: SourceKind,
    /// Path or URL for file and git references
    location: Option<String>,
}

impl PackageRef {
    /// Create a registry reference from its parts
    pub fn registry(scope: Option<&str>, name: &str, version: Option<&str>) -> Self {
        Self {
            id: PackageId::new(scope.map(str::to_string), name),
            version: version.map(str::to_string),
            source: SourceKind::Registry,
            location: None,
        }
    }

    /// Parse a package reference string
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some(path) = s.strip_prefix("file:") {
            return Self::parse_file_path(s, path);
        }
        if s.starts_with('/') || WINDOWS_PATH_RE.is_match(s) {
            return Self::parse_file_path(s, s);
        }
        if GIT_PREFIXES.iter().any(|p| s.starts_with(p)) {
            return Self::parse_git(s);
        }

        Self::parse_registry(s)
    }

    fn parse_file_path(input: &str, path: &str) -> Result<Self, ParseError> {
        if path.is_empty() {
            return Err(ParseError::EmptyPath(input.to_string()));
        }
        let id = id_from_location(input, path, None)?;
        Ok(Self {
            id,
            version: None,
            source: SourceKind::FilePath,
            location: Some(path.to_string()),
        })
    }

    fn parse_git(input: &str) -> Result<Self, ParseError> {
        let (url, git_ref) = match input.split_once('#') {
            Some((_, "")) => return Err(ParseError::EmptyGitRef(input.to_string())),
            Some((url, r)) => (url, Some(r)),
            None => (input, None),
        };

        if !url.ends_with(".git") {
            return Err(ParseError::InvalidGitUrl(input.to_string()));
        }

        let id = id_from_location(input, url, Some(".git"))?;
        Ok(Self {
            id,
            version: git_ref.map(str::to_string),
            source: SourceKind::Git,
            location: Some(url.to_string()),
        })
    }

    fn parse_registry(input: &str) -> Result<Self, ParseError> {
        let (scope, rest) = if let Some(scoped) = input.strip_prefix('@') {
            let (scope, rest) = scoped
                .split_once('/')
                .ok_or_else(|| ParseError::MissingScopedName(input.to_string()))?;
            if scope.is_empty() {
                return Err(ParseError::EmptyScope(input.to_string()));
            }
            (Some(scope), rest)
        } else {
            (None, input)
        };

        let (name, version) = match rest.split_once('@') {
            Some((_, "")) => return Err(ParseError::EmptyVersion(input.to_string())),
            Some((name, version)) => (name, Some(version)),
            None => (rest, None),
        };

        if name.is_empty() {
            return Err(ParseError::EmptyName(input.to_string()));
        }
        if name.contains(['/', '\\']) || name.chars().any(char::is_whitespace) {
            return Err(ParseError::InvalidName(input.to_string()));
        }

        Ok(Self::registry(scope, name, version))
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn scope(&self) -> Option<&str> {
        self.id.scope.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Path or URL of a file or git reference
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_file_path(&self) -> bool {
        self.source == SourceKind::FilePath
    }

    pub fn is_git(&self) -> bool {
        self.source == SourceKind::Git
    }

    pub fn is_registry(&self) -> bool {
        self.source == SourceKind::Registry
    }

    /// Compare identities, and versions unless `ignore_version` is set
    pub fn same(&self, other: &PackageRef, ignore_version: bool) -> bool {
        self.id == other.id && (ignore_version || self.version == other.version)
    }
}

/// Derive a package identity from the last segment(s) of a path or URL
fn id_from_location(
    input: &str,
    location: &str,
    strip_suffix: Option<&str>,
) -> Result<PackageId, ParseError> {
    let segments: Vec<&str> = location
        .split(['/', '\\', ':'])
        .filter(|s| !s.is_empty())
        .collect();

    let last = segments
        .last()
        .ok_or_else(|| ParseError::EmptyName(input.to_string()))?;
    let name = match strip_suffix {
        Some(suffix) => last.strip_suffix(suffix).unwrap_or(last),
        None => last,
    };
    if name.is_empty() {
        return Err(ParseError::EmptyName(input.to_string()));
    }

    let scope = segments
        .len()
        .checked_sub(2)
        .and_then(|i| segments[i].strip_prefix('@'))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(PackageId::new(scope, name))
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            SourceKind::Registry => {
                write!(f, "{}", self.id)?;
                if let Some(ref version) = self.version {
                    write!(f, "@{}", version)?;
                }
                Ok(())
            }
            SourceKind::FilePath => {
                write!(f, "file:{}", self.location.as_deref().unwrap_or_default())
            }
            SourceKind::Git => {
                write!(f, "{}", self.location.as_deref().unwrap_or_default())?;
                if let Some(ref version) = self.version {
                    write!(f, "#{}", version)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for PackageRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageRef::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry() {
        let p = PackageRef::parse("react-native@0.59.8").unwrap();
        assert_eq!(p.name(), "react-native");
        assert_eq!(p.scope(), None);
        assert_eq!(p.version(), Some("0.59.8"));
        assert_eq!(p.source(), SourceKind::Registry);

        let unversioned = PackageRef::parse("react-native").unwrap();
        assert_eq!(unversioned.version(), None);
    }

    #[test]
    fn test_parse_scoped() {
        let p = PackageRef::parse("@walmart/react-native-cart-api@1.2.3").unwrap();
        assert_eq!(p.scope(), Some("walmart"));
        assert_eq!(p.name(), "react-native-cart-api");
        assert_eq!(p.version(), Some("1.2.3"));
        assert_eq!(p.id().to_string(), "@walmart/react-native-cart-api");

        let range = PackageRef::parse("@walmart/foo@^1.0.0").unwrap();
        assert_eq!(range.version(), Some("^1.0.0"));
    }

    #[test]
    fn test_parse_file_path() {
        let p = PackageRef::parse("file:/Users/foo/my-miniapp").unwrap();
        assert!(p.is_file_path());
        assert_eq!(p.name(), "my-miniapp");
        assert_eq!(p.version(), None);
        assert_eq!(p.location(), Some("/Users/foo/my-miniapp"));

        let bare = PackageRef::parse("/Users/foo/node_modules/@scope/native-mod").unwrap();
        assert!(bare.is_file_path());
        assert_eq!(bare.scope(), Some("scope"));
        assert_eq!(bare.name(), "native-mod");

        let windows = PackageRef::parse(r"C:\dev\native-mod").unwrap();
        assert!(windows.is_file_path());
        assert_eq!(windows.name(), "native-mod");
    }

    #[test]
    fn test_parse_git() {
        let p = PackageRef::parse("git+ssh://git@github.com:org/native-mod.git#v1.0.0").unwrap();
        assert!(p.is_git());
        assert_eq!(p.name(), "native-mod");
        assert_eq!(p.version(), Some("v1.0.0"));
        assert_eq!(p.location(), Some("git+ssh://git@github.com:org/native-mod.git"));

        let https = PackageRef::parse("https://github.com/org/native-mod.git").unwrap();
        assert!(https.is_git());
        assert_eq!(https.version(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PackageRef::parse(""), Err(ParseError::Empty));
        assert!(matches!(PackageRef::parse("@1.0.0"), Err(ParseError::MissingScopedName(_))));
        assert!(matches!(PackageRef::parse("@/name"), Err(ParseError::EmptyScope(_))));
        assert!(matches!(PackageRef::parse("@scope/"), Err(ParseError::EmptyName(_))));
        assert!(matches!(PackageRef::parse("name@"), Err(ParseError::EmptyVersion(_))));
        assert!(matches!(PackageRef::parse("file:"), Err(ParseError::EmptyPath(_))));
        assert!(matches!(
            PackageRef::parse("https://github.com/org/repo.git#"),
            Err(ParseError::EmptyGitRef(_))
        ));
        assert!(matches!(
            PackageRef::parse("https://example.com/pkg.tgz"),
            Err(ParseError::InvalidGitUrl(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for s in [
            "react-native@0.59.8",
            "@scope/name@1.0.0",
            "@scope/name",
            "file:/Users/foo/bar",
            "git+ssh://git@github.com:org/repo.git#master",
            "https://github.com/org/repo.git",
        ] {
            assert_eq!(PackageRef::parse(s).unwrap().to_string(), s);
        }
        assert_eq!(PackageRef::parse("/abs/bar").unwrap().to_string(), "file:/abs/bar");
    }

    #[test]
    fn test_same_ignores_version() {
        let a = PackageRef::parse("apiOne@1.0.0").unwrap();
        let b = PackageRef::parse("apiOne@2.0.0").unwrap();
        let other = PackageRef::parse("@scope/apiOne@1.0.0").unwrap();
        assert!(a.same(&b, true));
        assert!(!a.same(&b, false));
        assert!(!a.same(&other, true));
        assert_eq!(a.id(), b.id());
    }
}
