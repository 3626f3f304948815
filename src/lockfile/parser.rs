// src/lockfile/parser.rs

//! Yarn v1 lockfile parser
//!
//! The format handled here:
//!
//! ```text
//! # yarn lockfile v1
//!
//! "@scope/a@^1.0.0", "@scope/a@^1.1.0":
//!   version "1.2.0"
//!   resolved "https://registry.yarnpkg.com/@scope/a/-/a-1.2.0.tgz#abc"
//!   integrity sha512-...
//!   dependencies:
//!     b "^2.0.0"
//!   optionalDependencies:
//!     fsevents "^1.2.7"
//! ```
//!
//! Each comma separated key of an entry header is a `name@range` specifier
//! resolving to the same entry.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use super::LockfileError;
use crate::error::Result;
use crate::package::PackageRef;

/// One resolved entry of the lockfile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockEntry {
    pub version: String,
    pub resolved: Option<String>,
    pub integrity: Option<String>,
    /// `(name, range)` pairs, in file order
    pub dependencies: Vec<(String, String)>,
    pub optional_dependencies: Vec<(String, String)>,
}

/// A lockfile key along with the version it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPackage {
    /// The `name@range` specifier, as written in the lockfile
    pub key: String,
    pub version: String,
}

impl LockedPackage {
    pub fn name(&self) -> &str {
        split_specifier(&self.key).0
    }

    pub fn range(&self) -> Option<&str> {
        split_specifier(&self.key).1
    }

    /// `key [version]`, as shown in dependency trees
    pub fn label(&self) -> String {
        format!("{} [{}]", self.key, self.version)
    }
}

/// Split a `name@range` specifier, keeping the scope of scoped packages
pub fn split_specifier(key: &str) -> (&str, Option<&str>) {
    let start = usize::from(key.starts_with('@'));
    match key[start..].find('@') {
        Some(i) => (&key[..start + i], Some(&key[start + i + 1..])),
        None => (key, None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Dependencies,
    OptionalDependencies,
    /// peerDependencies and other sections we don't track
    Ignored,
}

/// A parsed yarn lockfile
#[derive(Debug, Clone, Default)]
pub struct YarnLock {
    /// Every key with the index of its entry, in file order
    keys: Vec<(String, usize)>,
    key_index: HashMap<String, usize>,
    entries: Vec<LockEntry>,
    /// Map from `name@range` to the entries depending on it
    dependents: HashMap<String, Vec<usize>>,
}

impl YarnLock {
    /// Parse lockfile content
    pub fn parse(content: &str) -> std::result::Result<Self, LockfileError> {
        let mut lock = Self::default();
        let mut current: Option<(Vec<String>, LockEntry)> = None;
        let mut block = Block::None;

        for (i, raw) in content.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim_end();
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match line.len() - trimmed.len() {
                0 => {
                    if let Some((keys, entry)) = current.take() {
                        lock.insert(keys, entry)?;
                    }
                    let header = trimmed
                        .strip_suffix(':')
                        .ok_or_else(|| syntax(line_no, "expected ':' after entry keys"))?;
                    let keys = split_keys(header);
                    if keys.is_empty() {
                        return Err(syntax(line_no, "entry without keys"));
                    }
                    current = Some((keys, LockEntry::default()));
                    block = Block::None;
                }
                2 => {
                    let (_, entry) = current
                        .as_mut()
                        .ok_or_else(|| syntax(line_no, "field outside of an entry"))?;

                    if let Some(section) = trimmed.strip_suffix(':') {
                        block = match unquote(section) {
                            "dependencies" => Block::Dependencies,
                            "optionalDependencies" => Block::OptionalDependencies,
                            _ => Block::Ignored,
                        };
                        continue;
                    }

                    block = Block::None;
                    let (field, value) = split_pair(trimmed)
                        .ok_or_else(|| syntax(line_no, "expected a field and a value"))?;
                    match field {
                        "version" => entry.version = value.to_string(),
                        "resolved" => entry.resolved = Some(value.to_string()),
                        "integrity" => entry.integrity = Some(value.to_string()),
                        _ => {}
                    }
                }
                4 => {
                    let (_, entry) = current
                        .as_mut()
                        .ok_or_else(|| syntax(line_no, "dependency outside of an entry"))?;
                    let (name, range) = split_pair(trimmed)
                        .ok_or_else(|| syntax(line_no, "expected a name and a range"))?;
                    let pair = (name.to_string(), range.to_string());
                    match block {
                        Block::Dependencies => entry.dependencies.push(pair),
                        Block::OptionalDependencies => entry.optional_dependencies.push(pair),
                        Block::Ignored => {}
                        Block::None => {
                            return Err(syntax(line_no, "dependency outside of a dependencies block"));
                        }
                    }
                }
                indent => {
                    return Err(syntax(
                        line_no,
                        format!("unexpected indentation of {} spaces", indent),
                    ));
                }
            }
        }

        if let Some((keys, entry)) = current.take() {
            lock.insert(keys, entry)?;
        }

        debug!("Parsed yarn lockfile with {} entries", lock.entries.len());
        Ok(lock)
    }

    /// Read and parse a lockfile from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    fn insert(&mut self, keys: Vec<String>, entry: LockEntry) -> std::result::Result<(), LockfileError> {
        if entry.version.is_empty() {
            return Err(LockfileError::MissingVersion(keys.join(", ")));
        }

        let index = self.entries.len();
        for (name, range) in &entry.dependencies {
            self.dependents
                .entry(format!("{}@{}", name, range))
                .or_default()
                .push(index);
        }
        self.entries.push(entry);

        for key in keys {
            if self.key_index.contains_key(&key) {
                warn!("Duplicate lockfile key '{}', keeping the first entry", key);
                continue;
            }
            self.key_index.insert(key.clone(), index);
            self.keys.push((key, index));
        }
        Ok(())
    }

    /// The entry a key resolves to
    pub fn entry(&self, key: &str) -> Option<&LockEntry> {
        self.key_index.get(key).map(|&i| &self.entries[i])
    }

    /// All keys, in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find a package in the lockfile
    ///
    /// A versioned reference matches the key `name@version` exactly; an
    /// unversioned one matches every key of that package.
    pub fn find_package(&self, package: &PackageRef) -> Vec<LockedPackage> {
        let id = package.id().to_string();
        match package.version() {
            Some(version) => {
                let key = format!("{}@{}", id, version);
                self.key_index
                    .get(&key)
                    .map(|&i| vec![self.locked(&key, i)])
                    .unwrap_or_default()
            }
            None => self
                .keys
                .iter()
                .filter(|(k, _)| split_specifier(k).0 == id)
                .map(|(k, i)| self.locked(k, *i))
                .collect(),
        }
    }

    /// Find the packages depending on `dependency`, whose version is
    /// taken as the exact range the dependents ask for
    pub fn find_packages_with_dependency(&self, dependency: &PackageRef) -> Vec<LockedPackage> {
        match dependency.version() {
            Some(range) => self.dependents_of(&dependency.id().to_string(), range),
            None => Vec::new(),
        }
    }

    /// Keys of the entries listing `name` at `range` in their dependencies
    pub(crate) fn dependents_of(&self, name: &str, range: &str) -> Vec<LockedPackage> {
        let Some(entries) = self.dependents.get(&format!("{}@{}", name, range)) else {
            return Vec::new();
        };
        self.keys
            .iter()
            .filter(|(_, i)| entries.contains(i))
            .map(|(k, i)| self.locked(k, *i))
            .collect()
    }

    /// Keys of the entries depending on the given lockfile key
    pub(crate) fn dependents_of_key(&self, key: &str) -> Vec<LockedPackage> {
        match split_specifier(key) {
            (name, Some(range)) => self.dependents_of(name, range),
            (_, None) => Vec::new(),
        }
    }

    fn locked(&self, key: &str, index: usize) -> LockedPackage {
        LockedPackage {
            key: key.to_string(),
            version: self.entries[index].version.clone(),
        }
    }
}

fn syntax(line: usize, message: impl Into<String>) -> LockfileError {
    LockfileError::Syntax {
        line,
        message: message.into(),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Split an entry header on the commas outside quoted keys
fn split_keys(header: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in header.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                keys.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    keys.push(&header[start..]);

    keys.into_iter()
        .map(|k| unquote(k.trim()).to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let (first, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    Some((unquote(first), unquote(rest)))
}
