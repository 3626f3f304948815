// src/lockfile/report.rs

//! Mismatch diagnostics

use super::parser::YarnLock;
use super::tree::tree_for;
use crate::package::PackageRef;
use crate::resolver::ResolutionResult;

/// Render the dependency trees explaining each version mismatch
///
/// For every conflicting dependency, shows which packages pull in each of
/// the conflicting versions.
pub fn mismatch_report(result: &ResolutionResult, lock: &YarnLock) -> String {
    let mut out = String::new();

    for conflict in &result.conflicts {
        out.push_str(&format!("{}\n", conflict));

        let unversioned =
            PackageRef::registry(conflict.package.scope.as_deref(), &conflict.package.name, None);
        let locked: Vec<_> = lock
            .find_package(&unversioned)
            .into_iter()
            .filter(|p| conflict.versions.contains(&p.version))
            .collect();

        if locked.is_empty() {
            out.push_str("  (not found in lockfile)\n");
            continue;
        }
        for package in &locked {
            out.push_str(&tree_for(lock, package).render());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Tolerance, VersionResolver};

    #[test]
    fn test_mismatch_report() {
        let lock = YarnLock::parse(
            r#"
miniapp-a@1.0.0:
  version "1.0.0"
  dependencies:
    react-native-maps "0.20.0"

miniapp-b@1.0.0:
  version "1.0.0"
  dependencies:
    react-native-maps "0.21.0"

react-native-maps@0.20.0:
  version "0.20.0"

react-native-maps@0.21.0:
  version "0.21.0"
"#,
        )
        .unwrap();

        let packages = vec![
            PackageRef::parse("react-native-maps@0.20.0").unwrap(),
            PackageRef::parse("react-native-maps@0.21.0").unwrap(),
            PackageRef::parse("react-native-video@1.0.0").unwrap(),
            PackageRef::parse("react-native-video@1.0.1").unwrap(),
        ];
        let result = VersionResolver::new().resolve_category(&packages, Tolerance::Exact);

        let report = mismatch_report(&result, &lock);
        assert!(report.contains("Conflicting versions of react-native-maps (exact tolerance): 0.20.0, 0.21.0"));
        assert!(report.contains("react-native-maps@0.20.0 [0.20.0]\n\\-- miniapp-a@1.0.0 [1.0.0]\n"));
        assert!(report.contains("react-native-maps@0.21.0 [0.21.0]\n\\-- miniapp-b@1.0.0 [1.0.0]\n"));
        assert!(report.contains("react-native-video (exact tolerance): 1.0.0, 1.0.1\n  (not found in lockfile)"));
    }
}
