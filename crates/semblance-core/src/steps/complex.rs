//! Complex-object (member-by-member) comparison

use crate::context::NodeContext;
use crate::model::{MemberAccess, MemberSlot, NodeValue};
use crate::options::{EquivalencyOptions, MemberMatch};
use crate::pipeline::Step;
use crate::validator::Run;

/// Compares two non-collection, non-primitive objects by their selected
/// members:
///
/// 1. selection rules filter the expectation's members
/// 2. matching rules pair each selected member with a subject member
///    (default: same name, case-sensitive); a miss is a failure unless a
///    rule declared the member optional
/// 3. matched pairs recurse at `.Member`
///
/// A member whose accessor failed is reported at the member's path and does
/// not abort traversal. Types the value-type predicate declares atomic are
/// declined here and fall through to exact comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexTypeStep;

impl Step for ComplexTypeStep {
    fn name(&self) -> &'static str {
        "complex-type"
    }

    fn can_handle(&self, context: &NodeContext, options: &EquivalencyOptions) -> bool {
        match &*context.expectation.value() {
            NodeValue::Object { type_name, .. } => !options.is_value_type(type_name),
            _ => false,
        }
    }

    fn handle(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        options: &EquivalencyOptions,
    ) -> bool {
        let (expected_type, expected_members): (String, Vec<MemberSlot>) =
            match &*context.expectation.value() {
                NodeValue::Object { type_name, members } => (type_name.clone(), members.clone()),
                _ => return false,
            };

        let subject_members: Vec<MemberSlot> = match &*context.subject.value() {
            NodeValue::Object { members, .. } => members.clone(),
            NodeValue::Unit => {
                run.fail(
                    &context.path,
                    format!(
                        "expected an instance of {}, but subject is null",
                        expected_type
                    ),
                );
                return true;
            }
            other => {
                run.fail(
                    &context.path,
                    format!(
                        "expected an instance of {}, but subject is a {}",
                        expected_type,
                        other.shape_label()
                    ),
                );
                return true;
            }
        };

        let subject_names: Vec<String> =
            subject_members.iter().map(|m| m.name.clone()).collect();

        for member in &expected_members {
            if !options.selects(&member.name, &context.path) {
                continue;
            }
            let member_path = context.path.member(&member.name);

            let expected_value = match &member.access {
                MemberAccess::Readable(value) => value.clone(),
                MemberAccess::Failed(error) => {
                    run.fail(
                        &member_path,
                        format!(
                            "expectation member `{}` could not be read: {}",
                            member.name, error
                        ),
                    );
                    continue;
                }
            };

            match options.match_member(&member.name, &subject_names) {
                MemberMatch::Missing => {
                    run.fail(
                        &member_path,
                        format!(
                            "subject has no member matching expectation member `{}`",
                            member.name
                        ),
                    );
                }
                MemberMatch::Optional => {}
                MemberMatch::Matched(subject_name) => {
                    let slot = subject_members.iter().find(|m| m.name == subject_name);
                    match slot.map(|m| &m.access) {
                        Some(MemberAccess::Readable(subject_value)) => {
                            run.compare(context.child_member(
                                &member.name,
                                subject_value.clone(),
                                expected_value,
                            ));
                        }
                        Some(MemberAccess::Failed(error)) => {
                            run.fail(
                                &member_path,
                                format!(
                                    "subject member `{}` could not be read: {}",
                                    subject_name, error
                                ),
                            );
                        }
                        None => {
                            // A matching rule returned a name the subject does
                            // not actually have
                            run.fail(
                                &member_path,
                                format!(
                                    "matching rule paired `{}` with `{}`, which the subject does not have",
                                    member.name, subject_name
                                ),
                            );
                        }
                    }
                }
            }
        }
        true
    }
}
