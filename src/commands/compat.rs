// src/commands/compat.rs
//! Compatibility check command

use anyhow::{Context, Result};
use ern_resolve::config::parse_compat_file;
use ern_resolve::{native_app_compatibility, AppDescriptor};
use std::path::Path;
use tracing::info;

pub fn cmd_compat(input: &Path, descriptor: Option<&str>) -> Result<()> {
    let compat = parse_compat_file(input)
        .with_context(|| format!("Failed to load compatibility input '{}'", input.display()))?;
    let filter = descriptor.map(AppDescriptor::parse).transpose()?;

    let miniapp = compat.miniapp.native_dependencies()?;
    let apps = compat.native_apps()?;
    info!(
        "Checking {} against {} native application version(s)",
        compat.miniapp.name,
        apps.len()
    );

    let results = native_app_compatibility(&miniapp, &apps, filter.as_ref());
    if results.is_empty() {
        println!("No matching native application versions.");
        return Ok(());
    }

    for result in &results {
        println!(
            "{}{} : {}",
            result.descriptor,
            if result.is_released { " (released)" } else { "" },
            if result.is_compatible { "COMPATIBLE" } else { "NOT COMPATIBLE" }
        );
        println!("{}", result.report);
    }

    let compatible = results.iter().filter(|r| r.is_compatible).count();
    println!("Total: {} of {} compatible", compatible, results.len());
    Ok(())
}
