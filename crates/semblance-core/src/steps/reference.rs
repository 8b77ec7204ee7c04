//! Reference-equality shortcut

use crate::context::NodeContext;
use crate::options::EquivalencyOptions;
use crate::pipeline::Step;
use crate::validator::Run;

/// Claims a node when subject and expectation are the same allocation.
/// A value is always equivalent to itself, so there is nothing to compare
/// and no reason to descend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEqualityStep;

impl Step for ReferenceEqualityStep {
    fn name(&self) -> &'static str {
        "reference-equality"
    }

    fn can_handle(&self, context: &NodeContext, _options: &EquivalencyOptions) -> bool {
        context.subject.id() == context.expectation.id()
    }

    fn handle(
        &self,
        _context: &NodeContext,
        _run: &mut Run<'_>,
        _options: &EquivalencyOptions,
    ) -> bool {
        true
    }
}
