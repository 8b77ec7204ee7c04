//! Dictionary (mapping) comparison

use std::collections::BTreeSet;

use crate::context::NodeContext;
use crate::model::{MapKey, NodeValue};
use crate::options::EquivalencyOptions;
use crate::pipeline::Step;
use crate::validator::Run;

/// Two mappings are equivalent iff their key sets are equal and every shared
/// key maps to equivalent values. Key-set asymmetry is reported explicitly
/// for both sides; shared keys recurse at `[key]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryStep;

impl Step for DictionaryStep {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn can_handle(&self, context: &NodeContext, _options: &EquivalencyOptions) -> bool {
        matches!(&*context.expectation.value(), NodeValue::Mapping(_))
    }

    fn handle(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        _options: &EquivalencyOptions,
    ) -> bool {
        let expectation = context.expectation.value();
        let expected_entries = match &*expectation {
            NodeValue::Mapping(entries) => entries,
            _ => return false,
        };

        match &*context.subject.value() {
            NodeValue::Unit => {
                run.fail(
                    &context.path,
                    format!(
                        "expected a mapping with {} entr{}, but subject is null",
                        expected_entries.len(),
                        if expected_entries.len() == 1 { "y" } else { "ies" },
                    ),
                );
                return true;
            }
            NodeValue::Mapping(subject_entries) => {
                let subject_keys: BTreeSet<&MapKey> = subject_entries.keys().collect();
                let expected_keys: BTreeSet<&MapKey> = expected_entries.keys().collect();

                let subject_only: Vec<String> = subject_keys
                    .difference(&expected_keys)
                    .map(|k| k.to_string())
                    .collect();
                if !subject_only.is_empty() {
                    run.fail(
                        &context.path,
                        format!(
                            "subject contains key{} not found in expectation: {}",
                            if subject_only.len() == 1 { "" } else { "s" },
                            subject_only.join(", "),
                        ),
                    );
                }

                let expectation_only: Vec<String> = expected_keys
                    .difference(&subject_keys)
                    .map(|k| k.to_string())
                    .collect();
                if !expectation_only.is_empty() {
                    run.fail(
                        &context.path,
                        format!(
                            "subject is missing key{} found in expectation: {}",
                            if expectation_only.len() == 1 { "" } else { "s" },
                            expectation_only.join(", "),
                        ),
                    );
                }

                let shared: Vec<NodeContext> = expected_entries
                    .iter()
                    .filter_map(|(key, expected_value)| {
                        subject_entries.get(key).map(|subject_value| {
                            context.child_key(key, subject_value.clone(), expected_value.clone())
                        })
                    })
                    .collect();
                drop(expectation);
                for child in shared {
                    run.compare(child);
                }
            }
            other => {
                run.fail(
                    &context.path,
                    format!(
                        "expected a mapping, but subject is a {}",
                        other.shape_label()
                    ),
                );
            }
        }
        true
    }
}
