//! Per-node traversal state
//!
//! A [`NodeContext`] is the traversal cursor at one node of the comparison:
//! the subject and expectation handles, the path expression used verbatim in
//! failure messages, and the branch-local visited-pair set for cycle
//! detection. Contexts are created fresh for every member, element, or entry
//! descended into and never retained.

use semblance_core_types::{PathExpr, VisitedPair, VisitedSet};

use crate::model::{MapKey, NodeHandle};

/// The traversal cursor at one node of the comparison.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub subject: NodeHandle,
    pub expectation: NodeHandle,
    pub path: PathExpr,
    /// Identity pairs already under comparison on this branch. Grows only
    /// downward: siblings never see each other's entries.
    pub visited: VisitedSet,
}

impl NodeContext {
    /// Root context for a top-level validation.
    pub fn root(subject: NodeHandle, expectation: NodeHandle) -> Self {
        Self {
            subject,
            expectation,
            path: PathExpr::root(),
            visited: VisitedSet::new(),
        }
    }

    /// The identity pair of this context's own nodes.
    pub fn pair(&self) -> VisitedPair {
        VisitedPair::new(self.subject.id(), self.expectation.id())
    }

    /// Child context for an object member (`.Name`).
    pub fn child_member(&self, name: &str, subject: NodeHandle, expectation: NodeHandle) -> Self {
        self.descend(self.path.member(name), subject, expectation)
    }

    /// Child context for a sequence element (`[index]`).
    pub fn child_index(&self, index: usize, subject: NodeHandle, expectation: NodeHandle) -> Self {
        self.descend(self.path.index(index), subject, expectation)
    }

    /// Child context for a mapping entry (`[key]`).
    pub fn child_key(&self, key: &MapKey, subject: NodeHandle, expectation: NodeHandle) -> Self {
        self.descend(self.path.key(&key.to_string()), subject, expectation)
    }

    fn descend(&self, path: PathExpr, subject: NodeHandle, expectation: NodeHandle) -> Self {
        Self {
            subject,
            expectation,
            path,
            // The child's set is the parent's plus the parent's own pair
            visited: self.visited.with(self.pair()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descent_extends_path_and_visited_set() {
        let subject = NodeHandle::int(1);
        let expectation = NodeHandle::int(1);
        let root = NodeContext::root(subject.clone(), expectation.clone());

        let child = root.child_member("Orders", NodeHandle::int(2), NodeHandle::int(2));
        let grandchild = child.child_index(1, NodeHandle::int(3), NodeHandle::int(3));

        assert_eq!(grandchild.path.as_str(), "Orders[1]");
        assert!(grandchild.visited.contains(root.pair()));
        assert!(grandchild.visited.contains(child.pair()));
        assert!(!root.visited.contains(root.pair()));
    }

    #[test]
    fn sibling_contexts_do_not_share_visited_entries() {
        let root = NodeContext::root(NodeHandle::int(1), NodeHandle::int(1));
        let left = root.child_member("Left", NodeHandle::int(2), NodeHandle::int(2));
        let right = root.child_member("Right", NodeHandle::int(3), NodeHandle::int(3));

        assert!(!right.visited.contains(left.pair()));
        assert!(!left.visited.contains(right.pair()));
    }
}
