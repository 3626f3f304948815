// src/error.rs

//! Crate-wide error type
//!
//! Version disagreement is never an error on its own: the resolver reports it
//! as data. `VersionMismatch` exists for callers that escalate a non-empty
//! mismatch set into a hard stop.

use thiserror::Error;

use crate::descriptor::DescriptorParseError;
use crate::lockfile::LockfileError;
use crate::package::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid package reference: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid native application descriptor: {0}")]
    Descriptor(#[from] DescriptorParseError),

    #[error("Invalid lockfile: {0}")]
    Lockfile(#[from] LockfileError),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Malformed resolver input: {0}")]
    MalformedInput(String),

    #[error("Native dependencies with mismatching versions: {}", .0.join(", "))]
    VersionMismatch(Vec<String>),

    #[error("{0}")]
    NotOrphaned(String),

    #[error("Manifest lookup failed: {0}")]
    Manifest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
