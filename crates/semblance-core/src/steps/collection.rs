//! Collection (sequence) comparison

use crate::context::NodeContext;
use crate::model::{NodeHandle, NodeValue};
use crate::options::EquivalencyOptions;
use crate::pipeline::Step;
use crate::validator::Run;

/// Compares two sequences. Lengths must match (a mismatch is one failure
/// carrying both lengths, with no element comparison afterwards). The
/// ordering rule for the current path decides the mode:
///
/// - **ordered** (default): elements pair by index and recurse at `[i]`
/// - **unordered**: first-fit multiset match under full recursive
///   equivalence; every expectation element must consume exactly one subject
///   element, and leftovers on either side are reported
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionStep;

impl Step for CollectionStep {
    fn name(&self) -> &'static str {
        "collection"
    }

    fn can_handle(&self, context: &NodeContext, _options: &EquivalencyOptions) -> bool {
        matches!(&*context.expectation.value(), NodeValue::Sequence(_))
    }

    fn handle(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        options: &EquivalencyOptions,
    ) -> bool {
        let expected: Vec<NodeHandle> = match &*context.expectation.value() {
            NodeValue::Sequence(elements) => elements.clone(),
            _ => return false,
        };

        let subject: Vec<NodeHandle> = match &*context.subject.value() {
            NodeValue::Sequence(elements) => elements.clone(),
            NodeValue::Unit => {
                run.fail(
                    &context.path,
                    format!(
                        "expected a collection of {} element{}, but subject is null",
                        expected.len(),
                        if expected.len() == 1 { "" } else { "s" },
                    ),
                );
                return true;
            }
            other => {
                run.fail(
                    &context.path,
                    format!(
                        "expected a collection, but subject is a {}",
                        other.shape_label()
                    ),
                );
                return true;
            }
        };

        if subject.len() != expected.len() {
            run.fail(
                &context.path,
                format!(
                    "expected a collection of {} element(s), but subject has {}",
                    expected.len(),
                    subject.len(),
                ),
            );
            return true;
        }

        if options.ordered_at(&context.path) {
            for (index, (s, e)) in subject.iter().zip(expected.iter()).enumerate() {
                run.compare(context.child_index(index, s.clone(), e.clone()));
            }
        } else {
            self.match_unordered(context, run, &subject, &expected);
        }
        true
    }
}

impl CollectionStep {
    /// First-fit multiset match: greedy, not necessarily optimal, but every
    /// expectation element must be consumed and every subject element is
    /// consumed at most once.
    fn match_unordered(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        subject: &[NodeHandle],
        expected: &[NodeHandle],
    ) {
        let mut consumed = vec![false; subject.len()];

        for (ei, e) in expected.iter().enumerate() {
            let matched = subject.iter().enumerate().position(|(si, s)| {
                !consumed[si]
                    && run.probe(context.child_index(ei, s.clone(), e.clone()))
            });
            match matched {
                Some(si) => consumed[si] = true,
                None => {
                    let rendered = run.format(e);
                    run.fail(
                        &context.path,
                        format!(
                            "no remaining subject element matches expectation element [{}] ({})",
                            ei, rendered,
                        ),
                    );
                }
            }
        }

        let leftovers: Vec<String> = consumed
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(si, _)| format!("[{}] ({})", si, run.format(&subject[si])))
            .collect();
        if !leftovers.is_empty() {
            run.fail(
                &context.path,
                format!(
                    "subject contains {} element(s) not matched by any expectation element: {}",
                    leftovers.len(),
                    leftovers.join(", "),
                ),
            );
        }
    }
}
