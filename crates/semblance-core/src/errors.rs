//! Engine-internal error types
//!
//! Equivalence verdicts are never errors: a mismatch between subject and
//! expectation is reported as a [`crate::report::Failure`]. The error types
//! here cover misuse of the engine itself, currently pipeline mutations that
//! name an absent target step and invalid option combinations.
//!
//! Each kind maps to a stable `ERR_*` code usable for programmatic handling.

use thiserror::Error;

/// Result type alias using EqError
pub type Result<T> = std::result::Result<T, EqError>;

/// Canonical error kind taxonomy for the equivalence engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqErrorKind {
    /// A pipeline mutation named a target step type that is not present
    StepNotFound,
    /// An options builder call produced an unusable configuration
    InvalidOptions,
    /// Invariant breakage inside the engine itself
    Internal,
}

impl EqErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            EqErrorKind::StepNotFound => "ERR_STEP_NOT_FOUND",
            EqErrorKind::InvalidOptions => "ERR_INVALID_OPTIONS",
            EqErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the kind classification, the operation that failed, and a
/// human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EqError {
    /// A relative pipeline mutation (`insert_before`, `add_after`) named a
    /// target step type that is not currently registered.
    #[error("[ERR_STEP_NOT_FOUND] op={op}: target step `{target}` is not present in the pipeline")]
    StepNotFound {
        /// The pipeline operation that failed
        op: &'static str,
        /// Name of the absent target step
        target: &'static str,
    },

    /// An options builder call produced an unusable configuration.
    #[error("[ERR_INVALID_OPTIONS] op={op}: {message}")]
    InvalidOptions { op: &'static str, message: String },

    /// Invariant breakage inside the engine itself.
    #[error("[ERR_INTERNAL] {message}")]
    Internal { message: String },
}

impl EqError {
    /// Get the error kind
    pub fn kind(&self) -> EqErrorKind {
        match self {
            EqError::StepNotFound { .. } => EqErrorKind::StepNotFound,
            EqError::InvalidOptions { .. } => EqErrorKind::InvalidOptions,
            EqError::Internal { .. } => EqErrorKind::Internal,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
