// src/commands/resolve.rs
//! Native dependency resolution command

use anyhow::{Context, Result};
use ern_resolve::config::parse_container_file;
use ern_resolve::{mismatch_report, Composite, ResolutionResult, StaticManifest, VersionResolver, YarnLock};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn cmd_resolve(
    input: Option<&Path>,
    scan: &[PathBuf],
    manifest: Option<&Path>,
    lockfile: Option<&Path>,
) -> Result<()> {
    let result = match (input, scan.is_empty()) {
        (Some(input), _) => {
            info!("Resolving native dependencies from {}", input.display());
            let container = parse_container_file(input)
                .with_context(|| format!("Failed to load container input '{}'", input.display()))?;
            let sets = container.native_dependencies()?;
            VersionResolver::new().resolve(&sets)
        }
        (None, false) => {
            let manifest_path = manifest.context("--manifest is required with --scan")?;
            let manifest = StaticManifest::from_file(manifest_path)
                .with_context(|| format!("Failed to load manifest '{}'", manifest_path.display()))?;
            let composite = Composite::new(Vec::new(), scan.to_vec(), manifest);
            composite.resolved_native_dependencies()?
        }
        (None, true) => return Err(anyhow::anyhow!("Either --input or --scan is required")),
    };

    print_resolution(&result);

    if result.is_clean() {
        return Ok(());
    }

    let report = explain_mismatches(&result, lockfile, input, scan)?;
    println!();
    print!("{}", report);

    result.ensure_no_mismatches()?;
    Ok(())
}

const LOCKFILE_NAME: &str = "yarn.lock";

/// Render the dependency trees behind every mismatch
///
/// Without `--lockfile`, a yarn.lock next to the input file or next to a
/// scanned directory is used.
fn explain_mismatches(
    result: &ResolutionResult,
    lockfile: Option<&Path>,
    input: Option<&Path>,
    scan: &[PathBuf],
) -> Result<String> {
    let Some(path) = locate_lockfile(lockfile, input, scan) else {
        anyhow::bail!(
            "Mismatching versions of {}; a {} is needed to explain them, pass one with --lockfile",
            result.plugins_with_mismatching_versions.join(", "),
            LOCKFILE_NAME
        );
    };

    info!("Explaining mismatches with {}", path.display());
    let lock = YarnLock::from_path(&path)
        .with_context(|| format!("Failed to load lockfile '{}'", path.display()))?;
    Ok(mismatch_report(result, &lock))
}

fn locate_lockfile(lockfile: Option<&Path>, input: Option<&Path>, scan: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = lockfile {
        return Some(path.to_path_buf());
    }

    let mut candidates = Vec::new();
    if let Some(dir) = input.and_then(Path::parent) {
        candidates.push(dir.join(LOCKFILE_NAME));
    }
    for root in scan {
        candidates.push(root.join(LOCKFILE_NAME));
        // Scanned roots are usually node_modules directories
        if let Some(parent) = root.parent() {
            candidates.push(parent.join(LOCKFILE_NAME));
        }
    }
    candidates.into_iter().find(|path| path.is_file())
}

fn print_resolution(result: &ResolutionResult) {
    println!("Resolved native dependencies:");
    for package in &result.resolved {
        println!("  {}", package);
    }

    if !result.untracked.is_empty() {
        println!("\nNot declared in the manifest:");
        for package in &result.untracked {
            println!("  {}", package);
        }
    }

    if !result.conflicts.is_empty() {
        println!("\nMismatching versions:");
        for conflict in &result.conflicts {
            println!("  {}", conflict);
        }
    }

    println!(
        "\nTotal: {} resolved, {} mismatching",
        result.resolved.len(),
        result.plugins_with_mismatching_versions.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ern_resolve::{DependencyCategory, NativeDependencies, PackageRef};
    use std::fs;

    const LOCK: &str = r#"
cart-miniapp@1.0.0:
  version "1.0.0"
  dependencies:
    react-native-maps "0.20.0"

checkout-miniapp@1.0.0:
  version "1.0.0"
  dependencies:
    react-native-maps "0.21.0"

react-native-maps@0.20.0:
  version "0.20.0"

react-native-maps@0.21.0:
  version "0.21.0"
"#;

    fn mismatching() -> ResolutionResult {
        let sets: Vec<NativeDependencies> = ["react-native-maps@0.20.0", "react-native-maps@0.21.0"]
            .iter()
            .map(|spec| {
                let mut deps = NativeDependencies::new();
                deps.push(
                    Some(DependencyCategory::ThirdPartyInManifest),
                    PackageRef::parse(spec).unwrap(),
                );
                deps
            })
            .collect();
        VersionResolver::new().resolve(&sets)
    }

    #[test]
    fn test_lockfile_next_to_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("container.toml");
        fs::write(temp_dir.path().join(LOCKFILE_NAME), LOCK).unwrap();

        let report = explain_mismatches(&mismatching(), None, Some(&input), &[]).unwrap();
        assert!(report.contains("react-native-maps@0.20.0 [0.20.0]\n\\-- cart-miniapp@1.0.0 [1.0.0]\n"));
        assert!(report.contains("react-native-maps@0.21.0 [0.21.0]\n\\-- checkout-miniapp@1.0.0 [1.0.0]\n"));
    }

    #[test]
    fn test_lockfile_next_to_scanned_node_modules() {
        let temp_dir = tempfile::tempdir().unwrap();
        let node_modules = temp_dir.path().join("node_modules");
        fs::create_dir_all(&node_modules).unwrap();
        fs::write(temp_dir.path().join(LOCKFILE_NAME), LOCK).unwrap();

        assert_eq!(
            locate_lockfile(None, None, std::slice::from_ref(&node_modules)),
            Some(temp_dir.path().join(LOCKFILE_NAME))
        );
        let report = explain_mismatches(&mismatching(), None, None, &[node_modules]).unwrap();
        assert!(report.contains("cart-miniapp@1.0.0 [1.0.0]"));
    }

    #[test]
    fn test_mismatch_without_lockfile_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("container.toml");

        let err = explain_mismatches(&mismatching(), None, Some(&input), &[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("react-native-maps"));
        assert!(message.contains("--lockfile"));
    }
}
