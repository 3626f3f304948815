// src/resolver/group.rs

//! Grouping of package references by identity
//!
//! Grouping is kept separate from the tolerance check so that each step can
//! be inspected on its own.

use std::collections::HashMap;

use crate::package::{PackageId, PackageRef};

/// All references sharing one `(scope, name)` identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    pub id: PackageId,
    /// Distinct references, in first-seen order
    pub members: Vec<PackageRef>,
}

impl DependencyGroup {
    /// Members that carry a version usable for comparison
    ///
    /// File path references and unversioned references are left out.
    pub fn versioned(&self) -> impl Iterator<Item = &PackageRef> {
        self.members
            .iter()
            .filter(|p| !p.is_file_path() && p.version().is_some())
    }

    /// Distinct version strings of the versioned members, in first-seen order
    pub fn distinct_versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = Vec::new();
        for version in self.versioned().filter_map(|p| p.version()) {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
        versions
    }

    /// Versioned member carrying `version`
    ///
    /// References from different sources may share a version string; the
    /// smallest one in printed form is picked so input order doesn't matter.
    pub fn member_with_version(&self, version: &str) -> Option<&PackageRef> {
        self.versioned()
            .filter(|p| p.version() == Some(version))
            .min_by_key(|p| p.to_string())
    }

    /// Member standing for a group with nothing to compare
    pub fn canonical_member(&self) -> Option<&PackageRef> {
        self.members.iter().min_by_key(|p| p.to_string())
    }
}

/// Group references by identity in a single pass
///
/// Groups come out in the order their identity was first seen; identical
/// references collapse into one member.
pub fn group_by_identity<'a, I>(packages: I) -> Vec<DependencyGroup>
where
    I: IntoIterator<Item = &'a PackageRef>,
{
    let mut index: HashMap<PackageId, usize> = HashMap::new();
    let mut groups: Vec<DependencyGroup> = Vec::new();

    for package in packages {
        match index.get(package.id()) {
            Some(&i) => {
                let group = &mut groups[i];
                if !group.members.contains(package) {
                    group.members.push(package.clone());
                }
            }
            None => {
                index.insert(package.id().clone(), groups.len());
                groups.push(DependencyGroup {
                    id: package.id().clone(),
                    members: vec![package.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkgs(specs: &[&str]) -> Vec<PackageRef> {
        specs.iter().map(|s| PackageRef::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_grouping_order_and_dedup() {
        let input = pkgs(&["b@1.0.0", "a@1.0.0", "b@1.0.0", "b@1.1.0", "@s/a@2.0.0"]);
        let groups = group_by_identity(&input);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id.to_string(), "b");
        assert_eq!(groups[0].members, pkgs(&["b@1.0.0", "b@1.1.0"]));
        assert_eq!(groups[1].id.to_string(), "a");
        assert_eq!(groups[2].id.to_string(), "@s/a");
    }

    #[test]
    fn test_versioned_members() {
        let input = pkgs(&["file:/work/native-mod", "native-mod", "native-mod@1.0.0"]);
        let groups = group_by_identity(&input);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 3);
        assert_eq!(groups[0].distinct_versions(), vec!["1.0.0"]);
        assert_eq!(
            groups[0].member_with_version("1.0.0"),
            Some(&PackageRef::parse("native-mod@1.0.0").unwrap())
        );
    }

    #[test]
    fn test_member_picks_ignore_input_order() {
        let input = pkgs(&["native-mod@1.0.0", "git+https://host/native-mod.git#1.0.0"]);
        let mut reversed = input.clone();
        reversed.reverse();

        for packages in [&input, &reversed] {
            let group = &group_by_identity(packages.iter())[0];
            assert_eq!(
                group.member_with_version("1.0.0").unwrap().to_string(),
                "git+https://host/native-mod.git#1.0.0"
            );
        }

        let paths = pkgs(&["file:/work/b/native-mod", "file:/work/a/native-mod"]);
        assert_eq!(
            group_by_identity(&paths)[0].canonical_member().unwrap().to_string(),
            "file:/work/a/native-mod"
        );
    }
}
