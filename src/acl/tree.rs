use std::collections::BTreeMap;

/// Segment that grants a node and everything below it
pub const WILDCARD: &str = "*";

/// Separator between permission segments (`community.abc.mission.edit`)
pub const SEPARATOR: char = '.';

/// Node of a permission tree.
///
/// A plain leaf is a `Branch` without children and only grants its own path.
/// Descendants are granted exclusively through a `Wildcard` stored under the
/// `*` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionNode {
    Branch(PermissionTree),
    Wildcard,
}

/// Hierarchical view of a principal's flat permission list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTree {
    children: BTreeMap<String, PermissionNode>,
}

impl PermissionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True if this level carries a `*` key
    pub fn has_wildcard(&self) -> bool {
        matches!(self.children.get(WILDCARD), Some(PermissionNode::Wildcard))
    }

    pub fn get(&self, segment: &str) -> Option<&PermissionNode> {
        self.children.get(segment)
    }

    /// Insert one dot-separated permission string.
    /// Segments after a `*` are dropped, the wildcard already covers them.
    pub fn insert(&mut self, permission: &str) {
        let mut level = self;
        for segment in permission.split(SEPARATOR) {
            if segment == WILDCARD {
                level
                    .children
                    .insert(WILDCARD.to_string(), PermissionNode::Wildcard);
                return;
            }

            let node = level
                .children
                .entry(segment.to_string())
                .or_insert_with(|| PermissionNode::Branch(PermissionTree::new()));

            level = match node {
                PermissionNode::Branch(tree) => tree,
                // only reachable through a literal "*" key, handled above
                PermissionNode::Wildcard => return,
            };
        }
    }

    /// Rebuild the flat permission list: one string per leaf or wildcard
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(None, &mut out);
        out
    }

    // `prefix` is `None` only at the root; an empty segment is a real key
    fn collect_paths(&self, prefix: Option<&str>, out: &mut Vec<String>) {
        for (segment, node) in &self.children {
            let path = match prefix {
                None => segment.clone(),
                Some(prefix) => format!("{prefix}{SEPARATOR}{segment}"),
            };

            match node {
                PermissionNode::Wildcard => out.push(path),
                PermissionNode::Branch(tree) if tree.is_empty() => out.push(path),
                PermissionNode::Branch(tree) => tree.collect_paths(Some(&path), out),
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for PermissionTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = PermissionTree::new();
        for permission in iter {
            tree.insert(permission.as_ref());
        }
        tree
    }
}

/// Turn a flat list of permission strings into a permission tree
pub fn parse_permissions<I, S>(permissions: I) -> PermissionTree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    permissions.into_iter().collect()
}

/// Check whether `tree` grants `required`.
///
/// Walks the required segments; a `*` at any visited level grants the rest.
/// Otherwise every segment must exist, and the final node must exist.
pub fn find_permission(tree: &PermissionTree, required: &str) -> bool {
    let mut level = tree;
    for segment in required.split(SEPARATOR) {
        if level.has_wildcard() {
            return true;
        }

        match level.get(segment) {
            Some(PermissionNode::Branch(next)) => level = next,
            Some(PermissionNode::Wildcard) => return true,
            None => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_grants_nothing() {
        let tree = parse_permissions(Vec::<String>::new());
        assert!(tree.is_empty());
        assert!(!find_permission(&tree, "community.abc.mission.edit"));
        assert!(!find_permission(&tree, ""));
    }

    #[test]
    fn every_listed_permission_is_granted() {
        let list = [
            "community.abc.mission.edit",
            "community.abc.founder",
            "mission.my-op.editor",
            "admin.user",
            "a.b",
            "a.b.c",
        ];
        let tree = parse_permissions(list);
        for permission in list {
            assert!(find_permission(&tree, permission), "{permission} should be granted");
        }
    }

    #[test]
    fn global_wildcard_grants_everything() {
        let tree = parse_permissions(&["*"]);
        assert!(tree.has_wildcard());
        assert!(find_permission(&tree, "admin.superadmin"));
        assert!(find_permission(&tree, "community.xyz.leader"));
        assert!(find_permission(&tree, "anything"));
        assert!(find_permission(&tree, ""));
    }

    #[test]
    fn nested_wildcard_grants_descendants_only() {
        let tree = parse_permissions(&["a.b.*"]);
        assert!(find_permission(&tree, "a.b.c"));
        assert!(find_permission(&tree, "a.b.c.d"));
        assert!(!find_permission(&tree, "a.c"));
        assert!(!find_permission(&tree, "x.b.c"));
    }

    #[test]
    fn wildcard_in_the_middle_covers_the_whole_subtree() {
        let tree = parse_permissions(&["community.*.leader"]);
        assert!(find_permission(&tree, "community.abc.leader"));
        assert!(find_permission(&tree, "community.abc.founder"));
        assert_eq!(tree.flatten(), vec!["community.*".to_string()]);
    }

    #[test]
    fn plain_terminal_does_not_grant_deeper_paths() {
        let tree = parse_permissions(&["a.b"]);
        assert!(find_permission(&tree, "a.b"));
        assert!(!find_permission(&tree, "a.b.c"));
        assert!(!find_permission(&tree, "a.b.c.d"));
    }

    #[test]
    fn deeper_grant_satisfies_its_ancestors() {
        let tree = parse_permissions(&["a.b.c"]);
        assert!(find_permission(&tree, "a.b"));
        assert!(find_permission(&tree, "a"));
        assert!(!find_permission(&tree, "a.c"));
    }

    #[test]
    fn duplicates_collapse() {
        let once = parse_permissions(&["mission.op.editor"]);
        let twice = parse_permissions(&["mission.op.editor", "mission.op.editor"]);
        assert_eq!(once, twice);
        assert_eq!(twice.flatten(), vec!["mission.op.editor".to_string()]);
    }

    #[test]
    fn segments_are_case_sensitive() {
        let tree = parse_permissions(&["community.ABC.leader"]);
        assert!(!find_permission(&tree, "community.abc.leader"));
    }

    #[test]
    fn required_wildcard_is_literal() {
        let tree = parse_permissions(&["a.b"]);
        assert!(!find_permission(&tree, "a.*"));

        let tree = parse_permissions(&["a.*"]);
        assert!(find_permission(&tree, "a.*"));
    }

    #[test]
    fn reparsing_flattened_tree_is_stable() {
        let tree = parse_permissions(&[
            "community.abc.founder",
            "community.abc.mission.*",
            "a.b",
            "a.b.c",
            "admin.*",
            "admin.user",
            "mission.op.editor",
        ]);
        let rebuilt = parse_permissions(tree.flatten());
        assert_eq!(tree, rebuilt);
        assert_eq!(rebuilt.flatten(), tree.flatten());
    }

    #[test]
    fn empty_segments_survive_flattening() {
        let tree = parse_permissions(&[".x", "a..b"]);
        let flat = tree.flatten();
        assert_eq!(flat, vec![".x".to_string(), "a..b".to_string()]);

        let rebuilt = parse_permissions(&flat);
        assert_eq!(tree, rebuilt);
        assert!(find_permission(&rebuilt, ".x"));
        assert!(find_permission(&rebuilt, "a..b"));
        assert!(!find_permission(&rebuilt, "x"));
    }

    #[test]
    fn empty_permission_flattens_to_itself() {
        let tree = parse_permissions(&[""]);
        assert_eq!(tree.flatten(), vec![String::new()]);
        assert_eq!(parse_permissions(tree.flatten()), tree);
        assert!(find_permission(&tree, ""));
    }
}
