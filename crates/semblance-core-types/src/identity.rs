//! Node identity and branch-local cycle-detection state
//!
//! Equivalence is value-based, but cycle detection needs reference identity:
//! a `(subject, expectation)` identity pair already on the current recursion
//! branch means the pair is being compared further up the stack, and the
//! branch short-circuits as equivalent.
//!
//! The visited set is a value type extended by copy on every descent. Sibling
//! branches therefore never observe each other's visited state, which keeps
//! cycle detection branch-local rather than global.

use serde::{Deserialize, Serialize};

/// Reference identity of one node in a compared graph.
///
/// Derived from the node's allocation address; two handles to the same
/// allocation share a `NodeId`, distinct allocations never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Build an identity from a raw allocation address.
    pub fn from_address(address: usize) -> Self {
        Self(address)
    }
}

/// An identity pair currently under comparison on one recursion branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitedPair {
    pub subject: NodeId,
    pub expectation: NodeId,
}

impl VisitedPair {
    pub fn new(subject: NodeId, expectation: NodeId) -> Self {
        Self {
            subject,
            expectation,
        }
    }
}

/// The set of identity pairs on the current recursion branch.
///
/// Grows only along a single branch: `with` produces an extended copy for a
/// child context and leaves the parent's set untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet(Vec<VisitedPair>);

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `pair` is already being compared on this branch.
    pub fn contains(&self, pair: VisitedPair) -> bool {
        self.0.contains(&pair)
    }

    /// Extended copy for a child context; `self` is unchanged.
    #[must_use]
    pub fn with(&self, pair: VisitedPair) -> Self {
        let mut pairs = self.0.clone();
        pairs.push(pair);
        Self(pairs)
    }

    /// Number of pairs on this branch (recursion depth of compared pairs).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pair(s: usize, e: usize) -> VisitedPair {
        VisitedPair::new(NodeId::from_address(s), NodeId::from_address(e))
    }

    #[test]
    fn with_does_not_mutate_the_parent_set() {
        let parent = VisitedSet::new().with(pair(1, 2));
        let child = parent.with(pair(3, 4));

        assert!(child.contains(pair(3, 4)));
        assert!(!parent.contains(pair(3, 4)));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn pairs_are_directional() {
        let set = VisitedSet::new().with(pair(1, 2));
        assert!(set.contains(pair(1, 2)));
        assert!(!set.contains(pair(2, 1)));
    }

    proptest! {
        /// Sibling extensions of the same parent never observe each other.
        #[test]
        fn sibling_sets_are_disjoint_beyond_the_parent(
            base in proptest::collection::vec((0usize..50, 0usize..50), 0..8),
            left in (100usize..150, 100usize..150),
            right in (200usize..250, 200usize..250),
        ) {
            let mut parent = VisitedSet::new();
            for (s, e) in base {
                parent = parent.with(pair(s, e));
            }
            let left_branch = parent.with(pair(left.0, left.1));
            let right_branch = parent.with(pair(right.0, right.1));

            prop_assert!(left_branch.contains(pair(left.0, left.1)));
            prop_assert!(!right_branch.contains(pair(left.0, left.1)));
            prop_assert!(!left_branch.contains(pair(right.0, right.1)));
        }
    }
}
