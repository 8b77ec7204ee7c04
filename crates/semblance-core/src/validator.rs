//! The traversal orchestrator
//!
//! [`Validator`] drives depth-first recursion over the compared graphs. For
//! each [`NodeContext`] it checks the cycle guard, then type overrides, then
//! asks the step snapshot for the first applicable step. Steps spawn child
//! contexts and feed them back through the [`Run`], which accumulates every
//! failure; traversal never stops at the first difference.
//!
//! The step list and options are snapshotted when the validator is built and
//! never re-read mid-traversal, so concurrent mutation of process-wide
//! defaults cannot affect a running validation.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::context::NodeContext;
use crate::model::NodeHandle;
use crate::options::EquivalencyOptions;
use crate::pipeline::{Step, StepPipeline};
use crate::report::{DisplayFormatter, Failure, Formatter};
use semblance_core_types::PathExpr;

/// Drives one or more validations over a fixed options/pipeline snapshot.
pub struct Validator {
    steps: Vec<Arc<dyn Step>>,
    options: EquivalencyOptions,
    formatter: Arc<dyn Formatter>,
}

impl Validator {
    /// Validator over the canonical built-in pipeline.
    pub fn new(options: EquivalencyOptions) -> Self {
        Self::with_pipeline(options, &StepPipeline::new())
    }

    /// Validator over a snapshot of the given pipeline. Later mutation of
    /// `pipeline` does not affect this validator.
    pub fn with_pipeline(options: EquivalencyOptions, pipeline: &StepPipeline) -> Self {
        Self::with_steps(options, pipeline.steps())
    }

    /// Validator over an explicit step list (already snapshotted).
    pub fn with_steps(options: EquivalencyOptions, steps: Vec<Arc<dyn Step>>) -> Self {
        Self {
            steps,
            options,
            formatter: Arc::new(DisplayFormatter),
        }
    }

    /// Replace the formatter used to render values in failure messages.
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Compare two graphs, returning every discrepancy found. An empty list
    /// means the graphs are equivalent.
    pub fn validate(&self, subject: &NodeHandle, expectation: &NodeHandle) -> Vec<Failure> {
        debug!(steps = self.steps.len(), "starting equivalence validation");
        let mut run = Run {
            steps: &self.steps,
            options: &self.options,
            formatter: &*self.formatter,
            failures: Vec::new(),
        };
        run.compare(NodeContext::root(subject.clone(), expectation.clone()));
        debug!(
            failures = run.failures.len(),
            "equivalence validation finished"
        );
        run.failures
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field(
                "steps",
                &self.steps.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("options", &self.options)
            .finish()
    }
}

/// Mutable state of one validation: the accumulated failures plus the
/// snapshots steps use to recurse. Handed to [`Step::handle`] so steps can
/// record failures and feed child contexts back into the traversal.
pub struct Run<'a> {
    steps: &'a [Arc<dyn Step>],
    options: &'a EquivalencyOptions,
    formatter: &'a dyn Formatter,
    failures: Vec<Failure>,
}

impl<'a> Run<'a> {
    /// Compare the node described by `context`, recording any failures.
    pub fn compare(&mut self, context: NodeContext) {
        // Cycle guard: this pair is already being compared further up the
        // branch; assume consistency and stop descending.
        if context.visited.contains(context.pair()) {
            trace!(path = %context.path, "cycle detected, branch treated as equivalent");
            return;
        }

        // A configured type override owns the node outright.
        let expectation_label = context.expectation.type_label();
        if let Some(type_override) = self.options.override_for(&expectation_label) {
            trace!(path = %context.path, label = type_override.label(), "type override applied");
            if !type_override.compare(&context.subject, &context.expectation) {
                let message = format!(
                    "subject {} does not satisfy the custom comparison registered for `{}` (expected {})",
                    self.format(&context.subject),
                    expectation_label,
                    self.format(&context.expectation),
                );
                self.fail(&context.path, message);
            }
            return;
        }

        let steps = self.steps;
        let options = self.options;
        for step in steps {
            if !step.can_handle(&context, options) {
                continue;
            }
            trace!(path = %context.path, step = step.name(), "step claimed node");
            // First applicable step owns the node; no fall-through.
            if !step.handle(&context, self, options) {
                debug!(
                    path = %context.path,
                    step = step.name(),
                    "step declined after claiming; node treated as handled"
                );
            }
            return;
        }

        // Fail-closed: a node nobody can compare is a configuration error,
        // reported as a failure rather than silently passing.
        let message = format!(
            "no comparison step is able to handle this node (subject shape: {}, expectation shape: {})",
            context.subject.shape_label(),
            context.expectation.shape_label(),
        );
        self.fail(&context.path, message);
    }

    /// Run a comparison without recording its failures; returns whether the
    /// pair is equivalent. Used by the unordered multiset match.
    pub fn probe(&mut self, context: NodeContext) -> bool {
        let kept = std::mem::take(&mut self.failures);
        self.compare(context);
        let equivalent = self.failures.is_empty();
        self.failures = kept;
        equivalent
    }

    /// Record a failure at `path`.
    pub fn fail(&mut self, path: &PathExpr, message: impl Into<String>) {
        self.failures.push(Failure::new(path, message));
    }

    /// Render a value for a failure message.
    pub fn format(&self, node: &NodeHandle) -> String {
        self.formatter.format(node)
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}
