// src/lockfile/mod.rs

//! Yarn lockfile inspection
//!
//! A Container's yarn.lock records which package depends on which, at the
//! exact ranges the dependents asked for. This module parses a yarn v1
//! lockfile and answers the questions needed to explain a version mismatch:
//! who pulls a package in, and is a package still used by anything at all.

mod parser;
mod report;
mod tree;

pub use parser::{split_specifier, LockEntry, LockedPackage, YarnLock};
pub use report::mismatch_report;
pub use tree::{build_dependency_tree, ensure_orphaned, is_orphaned, DependencyTree};

use thiserror::Error;

/// Errors that can occur when parsing a yarn lockfile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockfileError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("entry '{0}' has no version")]
    MissingVersion(String),
}
