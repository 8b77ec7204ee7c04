//! Simple-equality fallback

use crate::context::NodeContext;
use crate::model::{deep_exact_eq, NodeValue, Scalar};
use crate::options::EquivalencyOptions;
use crate::pipeline::Step;
use crate::validator::Run;

/// Default comparison for primitives and anything no earlier step claimed.
///
/// Scalars compare by value with lossless numeric promotion across `Int` and
/// `UInt`; a registered per-kind comparer (e.g. a float tolerance) replaces
/// the exact check for that kind everywhere it recurs. Non-scalar shapes
/// reaching the fallback (atomic value types, shape mismatches) compare via
/// cycle-guarded exact structural equality.
///
/// `can_handle` always returns true; this step must stay last, or be
/// explicitly substituted, for the pipeline to remain total.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEqualityStep;

impl Step for SimpleEqualityStep {
    fn name(&self) -> &'static str {
        "simple-equality"
    }

    fn can_handle(&self, _context: &NodeContext, _options: &EquivalencyOptions) -> bool {
        true
    }

    fn handle(
        &self,
        context: &NodeContext,
        run: &mut Run<'_>,
        options: &EquivalencyOptions,
    ) -> bool {
        let verdict = {
            let subject = context.subject.value();
            let expectation = context.expectation.value();
            match (&*subject, &*expectation) {
                (NodeValue::Unit, NodeValue::Unit) => Verdict::Equivalent,
                (NodeValue::Unit, _) => Verdict::NullSubject,
                (_, NodeValue::Unit) => Verdict::NullExpectation,
                (NodeValue::Scalar(s), NodeValue::Scalar(e)) => {
                    let equal = match options.scalar_comparer(e.kind()) {
                        Some(comparer) => comparer(s, e),
                        None => scalar_equiv(s, e),
                    };
                    if equal {
                        Verdict::Equivalent
                    } else {
                        Verdict::Differs
                    }
                }
                _ => Verdict::NeedsExact,
            }
        };

        match verdict {
            Verdict::Equivalent => {}
            Verdict::NullSubject => {
                let rendered = run.format(&context.expectation);
                run.fail(
                    &context.path,
                    format!("expected {} but subject is null", rendered),
                );
            }
            Verdict::NullExpectation => {
                let rendered = run.format(&context.subject);
                run.fail(&context.path, format!("expected null but found {}", rendered));
            }
            Verdict::Differs => {
                let expected = run.format(&context.expectation);
                let actual = run.format(&context.subject);
                run.fail(
                    &context.path,
                    format!("expected {} but found {}", expected, actual),
                );
            }
            Verdict::NeedsExact => {
                if !deep_exact_eq(&context.subject, &context.expectation) {
                    let expected = run.format(&context.expectation);
                    let actual = run.format(&context.subject);
                    run.fail(
                        &context.path,
                        format!("expected {} but found {}", expected, actual),
                    );
                }
            }
        }
        true
    }
}

enum Verdict {
    Equivalent,
    NullSubject,
    NullExpectation,
    Differs,
    NeedsExact,
}

/// Exact scalar equivalence with lossless integer promotion. Floats compare
/// only against floats (no silent precision-losing promotion); `NaN` is not
/// equivalent to `NaN`.
fn scalar_equiv(subject: &Scalar, expectation: &Scalar) -> bool {
    match (subject, expectation) {
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        (Scalar::Int(a), Scalar::Int(b)) => a == b,
        (Scalar::UInt(a), Scalar::UInt(b)) => a == b,
        (Scalar::Int(s), Scalar::UInt(u)) | (Scalar::UInt(u), Scalar::Int(s)) => {
            *s >= 0 && *s as u64 == *u
        }
        (Scalar::Float(a), Scalar::Float(b)) => a == b,
        (Scalar::Text(a), Scalar::Text(b)) => a == b,
        (Scalar::Time(a), Scalar::Time(b)) => a == b,
        _ => false,
    }
}
