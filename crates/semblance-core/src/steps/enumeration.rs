//! Enumeration comparison

use crate::context::NodeContext;
use crate::model::NodeValue;
use crate::options::EquivalencyOptions;
use crate::pipeline::Step;
use crate::validator::Run;

/// Two enum values are equivalent iff their discriminants are numerically
/// equal after lossless promotion, regardless of declared enum type or
/// underlying storage width. A `u64` discriminant beyond `i64::MAX` never
/// equates to a negative signed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumStep;

impl Step for EnumStep {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn can_handle(&self, context: &NodeContext, _options: &EquivalencyOptions) -> bool {
        matches!(&*context.expectation.value(), NodeValue::Enum(_))
    }

    fn handle(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        _options: &EquivalencyOptions,
    ) -> bool {
        let expected = match &*context.expectation.value() {
            NodeValue::Enum(e) => e.clone(),
            _ => return false,
        };

        match &*context.subject.value() {
            NodeValue::Enum(actual) => {
                if !actual.discriminant.numeric_eq(expected.discriminant) {
                    run.fail(
                        &context.path,
                        format!(
                            "expected enum {}({}) but found {}({})",
                            expected.type_name,
                            expected.discriminant,
                            actual.type_name,
                            actual.discriminant,
                        ),
                    );
                }
            }
            other => {
                run.fail(
                    &context.path,
                    format!(
                        "expected enum {}({}) but subject is a {}",
                        expected.type_name,
                        expected.discriminant,
                        other.shape_label(),
                    ),
                );
            }
        }
        true
    }
}
