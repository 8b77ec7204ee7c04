//! Semblance Core - deep structural equivalence engine
//!
//! This crate decides whether two arbitrary object graphs (a *subject* and an
//! *expectation*) are semantically equal, independent of reference identity,
//! member ordering, declared type, or exact numeric representation. It
//! provides:
//!
//! - A dynamic value-graph model (`NodeHandle`) with explicit member
//!   descriptors, shared handles, and cycle support
//! - An immutable-per-run options model (selection, matching, and ordering
//!   rules, per-type overrides, scalar tolerances, value-type predicate)
//! - An ordered, mutable pipeline of comparison steps with relative insertion
//! - A cycle-safe depth-first validator that accumulates every discrepancy
//!   with a precise path expression
//! - Process-wide defaults with an explicit snapshot/configure/restore
//!   lifecycle
//!
//! Equivalence verdicts are data: one `validate` call returns an empty
//! failure list (equivalent) or the full list of path/reason pairs.

pub mod context;
pub mod defaults;
pub mod errors;
pub mod logging;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod report;
pub mod steps;
pub mod validator;

// Re-export commonly used types
pub use context::NodeContext;
pub use errors::{EqError, EqErrorKind, Result};
pub use model::{
    deep_exact_eq, Discriminant, EnumValue, MapKey, MemberAccess, MemberSlot, NodeHandle,
    NodeValue, Scalar, ScalarKind,
};
pub use options::{EquivalencyOptions, MatchOutcome, MemberMatch, OptionsBuilder};
pub use pipeline::{Step, StepPipeline};
pub use report::{
    assert_equivalent, DisplayFormatter, EquivalencyReport, Failure, FailureSink, Formatter,
    PanicSink,
};
pub use semblance_core_types::{NodeId, PathExpr, VisitedPair, VisitedSet};
pub use validator::{Run, Validator};
