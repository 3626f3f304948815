// src/lockfile/tree.rs

//! Reverse dependency trees
//!
//! The tree of a package lists, for every lockfile key of that package, the
//! packages depending on that exact key, then the packages depending on
//! those, and so on up to the roots of the lockfile.

use std::collections::{HashMap, HashSet};

use super::parser::{LockedPackage, YarnLock};
use crate::error::{Error, Result};
use crate::package::PackageRef;

/// A node of a reverse dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    pub label: String,
    pub children: Vec<DependencyTree>,
}

impl DependencyTree {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Render the tree, one node per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label);
        out.push('\n');
        render_children(&self.children, "", &mut out);
        out
    }
}

fn render_children(children: &[DependencyTree], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "\\-- " } else { "|-- " };
        let next_prefix = if is_last { "    " } else { "|   " };

        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&child.label);
        out.push('\n');
        render_children(&child.children, &format!("{}{}", prefix, next_prefix), out);
    }
}

/// Build one reverse dependency tree per lockfile key of `package`
pub fn build_dependency_tree(lock: &YarnLock, package: &PackageRef) -> Vec<DependencyTree> {
    lock.find_package(package)
        .iter()
        .map(|locked| tree_for(lock, locked))
        .collect()
}

/// Build the reverse dependency tree of a single lockfile key
pub(crate) fn tree_for(lock: &YarnLock, locked: &LockedPackage) -> DependencyTree {
    let mut walk = Walk {
        lock,
        path: HashSet::new(),
        memo: HashMap::new(),
    };
    walk.path.insert(locked.key.clone());
    let (children, _) = walk.dependents(&locked.key);
    DependencyTree {
        label: locked.label(),
        children,
    }
}

struct Walk<'a> {
    lock: &'a YarnLock,
    path: HashSet<String>,
    /// Subtrees of keys already walked, for those not cut by a cycle
    memo: HashMap<String, Vec<DependencyTree>>,
}

impl Walk<'_> {
    /// Dependents of `key`, and whether a cycle was cut below it
    fn dependents(&mut self, key: &str) -> (Vec<DependencyTree>, bool) {
        if let Some(children) = self.memo.get(key) {
            return (children.clone(), false);
        }

        let mut children = Vec::new();
        let mut cut = false;
        for dependent in self.lock.dependents_of_key(key) {
            // Lockfiles may contain dependency cycles
            if self.path.contains(&dependent.key) {
                children.push(DependencyTree::leaf(format!("{} [circular]", dependent.label())));
                cut = true;
                continue;
            }

            self.path.insert(dependent.key.clone());
            let (grandchildren, below) = self.dependents(&dependent.key);
            self.path.remove(&dependent.key);
            cut |= below;

            children.push(DependencyTree {
                label: dependent.label(),
                children: grandchildren,
            });
        }

        // A cut subtree depends on the path it was reached through
        if !cut {
            self.memo.insert(key.to_string(), children.clone());
        }
        (children, cut)
    }
}

/// Whether nothing in the lockfile depends on any key of `package`
pub fn is_orphaned(lock: &YarnLock, package: &PackageRef) -> bool {
    lock.find_package(package)
        .iter()
        .all(|locked| lock.dependents_of_key(&locked.key).is_empty())
}

/// Fail with the dependency trees of every package that is still used
pub fn ensure_orphaned(lock: &YarnLock, packages: &[PackageRef]) -> Result<()> {
    let mut message = String::new();

    for package in packages {
        if is_orphaned(lock, package) {
            continue;
        }
        message.push_str(&format!(
            "{} is not orphaned. It is used by one or more packages :\n",
            package
        ));
        for tree in build_dependency_tree(lock, package) {
            message.push_str(&tree.render());
        }
    }

    if message.is_empty() {
        Ok(())
    } else {
        Err(Error::NotOrphaned(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"
app@1.0.0:
  version "1.0.0"
  dependencies:
    miniapp-a "^1.0.0"
    miniapp-b "^2.0.0"

miniapp-a@^1.0.0:
  version "1.0.3"
  dependencies:
    react-native-maps "0.20.0"

miniapp-b@^2.0.0:
  version "2.1.0"
  dependencies:
    react-native-maps "0.20.0"

react-native-maps@0.20.0:
  version "0.20.0"

unused@^1.0.0:
  version "1.0.0"

cycle-a@^1.0.0:
  version "1.0.0"
  dependencies:
    cycle-b "^1.0.0"

cycle-b@^1.0.0:
  version "1.0.0"
  dependencies:
    cycle-a "^1.0.0"
"#;

    fn lock() -> YarnLock {
        YarnLock::parse(LOCK).unwrap()
    }

    fn pkg(s: &str) -> PackageRef {
        PackageRef::parse(s).unwrap()
    }

    #[test]
    fn test_build_tree() {
        let trees = build_dependency_tree(&lock(), &pkg("react-native-maps"));
        assert_eq!(trees.len(), 1);
        assert_eq!(
            trees[0].render(),
            "react-native-maps@0.20.0 [0.20.0]\n\
             |-- miniapp-a@^1.0.0 [1.0.3]\n\
             |   \\-- app@1.0.0 [1.0.0]\n\
             \\-- miniapp-b@^2.0.0 [2.1.0]\n\
             \x20   \\-- app@1.0.0 [1.0.0]\n"
        );
    }

    #[test]
    fn test_leaf_tree() {
        let trees = build_dependency_tree(&lock(), &pkg("unused"));
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_leaf());
        assert_eq!(trees[0].render(), "unused@^1.0.0 [1.0.0]\n");
    }

    #[test]
    fn test_cycle_is_cut() {
        let trees = build_dependency_tree(&lock(), &pkg("cycle-a@^1.0.0"));
        let b = &trees[0].children[0];
        assert_eq!(b.label, "cycle-b@^1.0.0 [1.0.0]");
        assert_eq!(b.children[0].label, "cycle-a@^1.0.0 [1.0.0] [circular]");
        assert!(b.children[0].is_leaf());
    }

    #[test]
    fn test_layered_diamonds() {
        // Every layer depends on both packages of the layer below
        let layers = 12;
        let mut content = String::from("base@1.0.0:\n  version \"1.0.0\"\n\n");
        for layer in 0..layers {
            let below = if layer == 0 {
                vec!["base \"1.0.0\"".to_string()]
            } else {
                vec![
                    format!("l{}-a \"1.0.0\"", layer - 1),
                    format!("l{}-b \"1.0.0\"", layer - 1),
                ]
            };
            for side in ["a", "b"] {
                content.push_str(&format!("l{}-{}@1.0.0:\n  version \"1.0.0\"\n  dependencies:\n", layer, side));
                for dep in &below {
                    content.push_str(&format!("    {}\n", dep));
                }
                content.push('\n');
            }
        }

        let lock = YarnLock::parse(&content).unwrap();
        let trees = build_dependency_tree(&lock, &pkg("base"));
        let leaves = trees[0].render().lines().filter(|l| l.contains(&format!("l{}-", layers - 1))).count();
        assert_eq!(leaves, 1 << layers);
        assert_eq!(trees[0].children[0].children, trees[0].children[1].children);
    }

    #[test]
    fn test_memoized_subtree_keeps_cycle_marks() {
        let content = r#"
leaf@1.0.0:
  version "1.0.0"

mid@1.0.0:
  version "1.0.0"
  dependencies:
    leaf "1.0.0"
    loop "1.0.0"

loop@1.0.0:
  version "1.0.0"
  dependencies:
    mid "1.0.0"

top@1.0.0:
  version "1.0.0"
  dependencies:
    leaf "1.0.0"
"#;
        let lock = YarnLock::parse(content).unwrap();
        let trees = build_dependency_tree(&lock, &pkg("leaf"));
        let rendered = trees[0].render();
        assert!(rendered.contains("mid@1.0.0 [1.0.0] [circular]"));
        assert!(rendered.contains("\\-- top@1.0.0 [1.0.0]"));
    }

    #[test]
    fn test_orphaned() {
        let lock = lock();
        assert!(is_orphaned(&lock, &pkg("unused")));
        assert!(is_orphaned(&lock, &pkg("not-in-lockfile")));
        assert!(!is_orphaned(&lock, &pkg("react-native-maps@0.20.0")));

        assert!(ensure_orphaned(&lock, &[pkg("unused"), pkg("app")]).is_ok());

        let err = ensure_orphaned(&lock, &[pkg("miniapp-a"), pkg("unused")]).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("miniapp-a is not orphaned. It is used by one or more packages :\n"));
        assert!(message.contains("\\-- app@1.0.0 [1.0.0]"));
        assert!(!message.contains("unused"));
    }
}
