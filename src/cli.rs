// src/cli.rs
//! CLI definitions for ern-resolve
//!
//! The command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ern-resolve")]
#[command(version)]
#[command(about = "Native dependency version reconciliation for MiniApp Containers", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the native dependency versions of a Container's MiniApps
    Resolve {
        /// Container input file listing each MiniApp's native dependencies
        #[arg(short, long, conflicts_with = "scan")]
        input: Option<PathBuf>,

        /// Directories to scan for installed native packages
        #[arg(short, long, num_args = 1.., requires = "manifest")]
        scan: Vec<PathBuf>,

        /// Manifest file declaring the known native dependencies
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// yarn.lock used to explain mismatches
        #[arg(short, long)]
        lockfile: Option<PathBuf>,
    },

    /// Check a MiniApp against native application versions
    Compat {
        /// Compatibility input file
        #[arg(short, long)]
        input: PathBuf,

        /// Only check matching versions (name, name:platform or name:platform:version)
        #[arg(short, long)]
        descriptor: Option<String>,
    },

    /// Show which packages depend on a package
    Why {
        /// Path to the yarn.lock file
        #[arg(short, long)]
        lockfile: PathBuf,

        /// Package, optionally with the exact range used in the lockfile
        package: String,
    },

    /// Check that packages are no longer used by anything
    Orphaned {
        /// Path to the yarn.lock file
        #[arg(short, long)]
        lockfile: PathBuf,

        /// Packages expected to be orphaned
        #[arg(required = true)]
        packages: Vec<String>,
    },
}
