// src/commands/lockfile.rs
//! Lockfile inspection commands

use anyhow::{Context, Result};
use ern_resolve::{build_dependency_tree, ensure_orphaned, PackageRef, YarnLock};
use std::path::Path;
use tracing::info;

fn load(lockfile: &Path) -> Result<YarnLock> {
    YarnLock::from_path(lockfile)
        .with_context(|| format!("Failed to load lockfile '{}'", lockfile.display()))
}

/// Show the reverse dependency tree of a package
pub fn cmd_why(lockfile: &Path, package: &str) -> Result<()> {
    let lock = load(lockfile)?;
    let package = PackageRef::parse(package)?;
    info!("Building dependency tree for {}", package);

    let trees = build_dependency_tree(&lock, &package);
    if trees.is_empty() {
        return Err(anyhow::anyhow!("Package '{}' is not in the lockfile", package));
    }

    for tree in &trees {
        print!("{}", tree.render());
    }
    Ok(())
}

/// Fail if any of the packages is still depended upon
pub fn cmd_orphaned(lockfile: &Path, packages: &[String]) -> Result<()> {
    let lock = load(lockfile)?;
    let packages = packages
        .iter()
        .map(|p| PackageRef::parse(p))
        .collect::<Result<Vec<_>, _>>()?;

    ensure_orphaned(&lock, &packages)?;
    println!("{} package(s) orphaned", packages.len());
    Ok(())
}
