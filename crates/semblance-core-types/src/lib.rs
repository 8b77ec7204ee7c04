//! Core types shared across the Semblance equivalence engine
//!
//! This crate provides the foundational value types used by the traversal
//! and reporting facilities:
//!
//! - **Path expressions**: `PathExpr`, the dotted/indexed location of a node
//!   inside the compared graphs (`Orders[2].Total`)
//! - **Identity types**: `NodeId`, `VisitedPair` and `VisitedSet`, the
//!   branch-local cycle-detection state threaded through traversal contexts

pub mod identity;
pub mod path;

pub use identity::{NodeId, VisitedPair, VisitedSet};
pub use path::PathExpr;
