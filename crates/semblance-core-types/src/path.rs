//! Path expressions for traversal positions
//!
//! A `PathExpr` names one position in the compared object graphs. The
//! rendered form is used verbatim in failure messages, so the formatting
//! rules here are part of the reporting contract:
//!
//! - member descent appends `.Name` (no leading dot at the root)
//! - sequence descent appends `[index]`
//! - mapping descent appends `[key]`

use serde::{Deserialize, Serialize};

/// The dotted/indexed path of a single node inside the compared graphs.
///
/// Paths are immutable; descending into a member, element, or key produces
/// a new `PathExpr`. The root path renders as `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathExpr(String);

impl PathExpr {
    /// The root of a traversal.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Descend into a named member: `Orders` → `Orders.Total`.
    pub fn member(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    /// Descend into a sequence element: `Orders` → `Orders[2]`.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// Descend into a mapping entry: `Totals` → `Totals[gross]`.
    ///
    /// `key` is the rendered key, already formatted by the caller.
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{}]", self.0, key))
    }

    /// True for the root of a traversal.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The rendered path, exactly as failure messages show it.
    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "subject"
        } else {
            &self.0
        }
    }
}

impl Default for PathExpr {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for PathExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
