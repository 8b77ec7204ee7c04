//! Value-graph model for compared object graphs
//!
//! The engine does not reflect over native Rust types. Callers materialize
//! their subject and expectation as graphs of [`NodeHandle`] values carrying
//! explicit member descriptors, which is what the comparison steps traverse.

pub mod node;

pub use node::{
    deep_exact_eq, Discriminant, EnumValue, MapKey, MemberAccess, MemberSlot, NodeHandle,
    NodeValue, Scalar, ScalarKind,
};
