//! Ordered registry of comparison steps
//!
//! The pipeline is an ordered list of [`Step`] implementations, unique by
//! step type, insertion-order significant: the first step whose `can_handle`
//! returns true owns a node. Mutation operations support prepending,
//! relative insertion, appending (before the trailing fallback), removal,
//! and a `reset` that restores the canonical built-in order regardless of
//! prior mutation history.

use std::any::TypeId;
use std::sync::Arc;

use crate::context::NodeContext;
use crate::errors::{EqError, Result};
use crate::options::EquivalencyOptions;
use crate::steps::{
    CollectionStep, ComplexTypeStep, DictionaryStep, EnumStep, ReferenceEqualityStep,
    SimpleEqualityStep,
};
use crate::validator::Run;

/// One strategy in the comparison pipeline.
///
/// `can_handle` decides whether the step claims the node; `handle` performs
/// the comparison, recording failures and spawning child comparisons through
/// the [`Run`]. Once a step has claimed a node the pipeline does not fall
/// through to later steps, even if `handle` returns false.
pub trait Step: Send + Sync {
    /// Stable step name, used in messages and debug output.
    fn name(&self) -> &'static str;

    /// Whether this step claims the node.
    fn can_handle(&self, context: &NodeContext, options: &EquivalencyOptions) -> bool;

    /// Compare the node. Returns true when the node was handled.
    fn handle(&self, context: &NodeContext, run: &mut Run<'_>, options: &EquivalencyOptions)
        -> bool;
}

#[derive(Clone)]
struct PipelineEntry {
    type_id: TypeId,
    step: Arc<dyn Step>,
}

/// Ordered, mutable registry of comparison steps.
#[derive(Clone)]
pub struct StepPipeline {
    entries: Vec<PipelineEntry>,
}

impl StepPipeline {
    /// The canonical built-in pipeline: reference equality, dictionary,
    /// collection, enum, complex type, then the simple-equality fallback.
    pub fn new() -> Self {
        let mut pipeline = Self::empty();
        pipeline.reset();
        pipeline
    }

    /// An empty pipeline. A pipeline without a fallback step reports every
    /// node it cannot dispatch as a failure (fail-closed), so this is only
    /// useful as a base for fully custom step sets.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Prepend a step; it becomes the first consulted.
    pub fn insert<S: Step + 'static>(&mut self, step: S) {
        self.remove_type(TypeId::of::<S>());
        self.entries.insert(0, Self::entry(step));
    }

    /// Insert a step immediately before `Target`.
    ///
    /// # Errors
    ///
    /// `ERR_STEP_NOT_FOUND` when `Target` is not present.
    pub fn insert_before<Target: Step + 'static, S: Step + 'static>(
        &mut self,
        step: S,
    ) -> Result<()> {
        self.remove_type(TypeId::of::<S>());
        let position = self
            .position_of(TypeId::of::<Target>())
            .ok_or(EqError::StepNotFound {
                op: "insert_before",
                target: std::any::type_name::<Target>(),
            })?;
        self.entries.insert(position, Self::entry(step));
        Ok(())
    }

    /// Append a step. When the trailing entry is the simple-equality
    /// fallback, the step lands immediately before it so the fallback stays
    /// last.
    pub fn add<S: Step + 'static>(&mut self, step: S) {
        self.remove_type(TypeId::of::<S>());
        let fallback_last = self
            .entries
            .last()
            .is_some_and(|e| e.type_id == TypeId::of::<SimpleEqualityStep>());
        if fallback_last {
            let position = self.entries.len() - 1;
            self.entries.insert(position, Self::entry(step));
        } else {
            self.entries.push(Self::entry(step));
        }
    }

    /// Insert a step immediately after `Target`.
    ///
    /// # Errors
    ///
    /// `ERR_STEP_NOT_FOUND` when `Target` is not present.
    pub fn add_after<Target: Step + 'static, S: Step + 'static>(&mut self, step: S) -> Result<()> {
        self.remove_type(TypeId::of::<S>());
        let position = self
            .position_of(TypeId::of::<Target>())
            .ok_or(EqError::StepNotFound {
                op: "add_after",
                target: std::any::type_name::<Target>(),
            })?;
        self.entries.insert(position + 1, Self::entry(step));
        Ok(())
    }

    /// Remove a step by type. No-op when absent, never an error.
    pub fn remove<S: Step + 'static>(&mut self) {
        self.remove_type(TypeId::of::<S>());
    }

    /// Remove every step.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Restore the canonical built-in order regardless of prior mutations.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(Self::entry(ReferenceEqualityStep));
        self.entries.push(Self::entry(DictionaryStep));
        self.entries.push(Self::entry(CollectionStep));
        self.entries.push(Self::entry(EnumStep));
        self.entries.push(Self::entry(ComplexTypeStep));
        self.entries.push(Self::entry(SimpleEqualityStep));
    }

    /// Snapshot of the current step order, in consultation order.
    pub fn steps(&self) -> Vec<Arc<dyn Step>> {
        self.entries.iter().map(|e| e.step.clone()).collect()
    }

    /// Step names in consultation order (for assertions and debug output).
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry<S: Step + 'static>(step: S) -> PipelineEntry {
        PipelineEntry {
            type_id: TypeId::of::<S>(),
            step: Arc::new(step),
        }
    }

    fn position_of(&self, type_id: TypeId) -> Option<usize> {
        self.entries.iter().position(|e| e.type_id == type_id)
    }

    fn remove_type(&mut self, type_id: TypeId) {
        self.entries.retain(|e| e.type_id != type_id);
    }
}

impl Default for StepPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StepPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StepPipeline").field(&self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [&str; 6] = [
        "reference-equality",
        "dictionary",
        "collection",
        "enum",
        "complex-type",
        "simple-equality",
    ];

    #[test]
    fn new_pipeline_has_canonical_order() {
        assert_eq!(StepPipeline::new().names(), CANONICAL);
    }

    #[test]
    fn reset_restores_canonical_order_after_arbitrary_mutation() {
        let mut pipeline = StepPipeline::new();
        pipeline.remove::<DictionaryStep>();
        pipeline.insert(SimpleEqualityStep);
        pipeline.clear();
        pipeline.reset();
        assert_eq!(pipeline.names(), CANONICAL);
    }

    #[test]
    fn remove_of_absent_step_is_a_no_op() {
        let mut pipeline = StepPipeline::new();
        pipeline.remove::<DictionaryStep>();
        let names = pipeline.names();
        pipeline.remove::<DictionaryStep>();
        assert_eq!(pipeline.names(), names);
    }

    #[test]
    fn relative_insertion_with_absent_target_reports_step_not_found() {
        let mut pipeline = StepPipeline::new();
        pipeline.remove::<EnumStep>();
        let err = pipeline.insert_before::<EnumStep, DictionaryStep>(DictionaryStep);
        assert_eq!(err.unwrap_err().code(), "ERR_STEP_NOT_FOUND");
    }

    #[test]
    fn add_keeps_the_fallback_last() {
        let mut pipeline = StepPipeline::new();
        pipeline.remove::<EnumStep>();
        pipeline.add(EnumStep);
        assert_eq!(
            pipeline.names(),
            [
                "reference-equality",
                "dictionary",
                "collection",
                "complex-type",
                "enum",
                "simple-equality",
            ]
        );
    }

    #[test]
    fn reinserting_a_present_step_moves_it() {
        let mut pipeline = StepPipeline::new();
        pipeline.insert(EnumStep);
        assert_eq!(
            pipeline.names(),
            [
                "enum",
                "reference-equality",
                "dictionary",
                "collection",
                "complex-type",
                "simple-equality",
            ]
        );
        assert_eq!(pipeline.len(), 6);
    }
}
