//! Failure reporting: failures, the formatter collaborator, and the
//! assertion-failure sink
//!
//! Failures are plain data; rendering them for humans goes through a
//! [`Formatter`] (value → display string, never affects the verdict) and the
//! aggregated message is handed to a [`FailureSink`], the seam where a test
//! framework raises its own failure type.

use serde::{Deserialize, Serialize};

use semblance_core_types::PathExpr;

use crate::model::{NodeHandle, NodeValue, Scalar};
use crate::options::EquivalencyOptions;
use crate::validator::Validator;

/// One discrepancy found during traversal: where, and how it differed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// The rendered path expression, exactly as the traversal built it
    pub path: String,
    /// Human-readable description of the difference
    pub message: String,
}

impl Failure {
    pub fn new(path: &PathExpr, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Renders node values for failure messages. Never affects the verdict.
pub trait Formatter: Send + Sync {
    fn format(&self, node: &NodeHandle) -> String;
}

/// Default formatter: scalars verbatim (text quoted), containers abbreviated
/// beyond a shallow depth so rendering stays cycle-safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayFormatter;

impl DisplayFormatter {
    const MAX_DEPTH: usize = 2;
    const MAX_ELEMENTS: usize = 4;

    fn render(&self, node: &NodeHandle, depth: usize) -> String {
        if depth > Self::MAX_DEPTH {
            return "…".to_string();
        }
        match &*node.value() {
            NodeValue::Unit => "<null>".to_string(),
            NodeValue::Scalar(scalar) => self.render_scalar(scalar),
            NodeValue::Enum(e) => format!("{}({})", e.type_name, e.discriminant),
            NodeValue::Sequence(elements) => {
                if elements.len() > Self::MAX_ELEMENTS {
                    format!("<sequence of {} elements>", elements.len())
                } else {
                    let rendered: Vec<String> = elements
                        .iter()
                        .map(|e| self.render(e, depth + 1))
                        .collect();
                    format!("[{}]", rendered.join(", "))
                }
            }
            NodeValue::Mapping(entries) => {
                if entries.len() > Self::MAX_ELEMENTS {
                    format!("<mapping of {} entries>", entries.len())
                } else {
                    let rendered: Vec<String> = entries
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k, self.render(v, depth + 1)))
                        .collect();
                    format!("{{{}}}", rendered.join(", "))
                }
            }
            NodeValue::Object { type_name, members } => {
                format!("<{} with {} members>", type_name, members.len())
            }
        }
    }

    fn render_scalar(&self, scalar: &Scalar) -> String {
        match scalar {
            Scalar::Bool(v) => v.to_string(),
            Scalar::Int(v) => v.to_string(),
            Scalar::UInt(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Text(v) => format!("\"{}\"", v),
            Scalar::Time(v) => v.to_rfc3339(),
        }
    }
}

impl Formatter for DisplayFormatter {
    fn format(&self, node: &NodeHandle) -> String {
        self.render(node, 0)
    }
}

/// Receives the aggregated failure message at the end of a non-equivalent
/// validation. Implementations raise the test framework's failure type.
pub trait FailureSink: Send + Sync {
    fn raise(&self, message: &str);
}

/// Built-in sink: panics with the aggregated message, which every Rust test
/// framework reports as a test failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicSink;

impl FailureSink for PanicSink {
    fn raise(&self, message: &str) {
        panic!("{}", message);
    }
}

/// The collected outcome of one top-level validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalencyReport {
    pub failures: Vec<Failure>,
}

impl EquivalencyReport {
    pub fn new(failures: Vec<Failure>) -> Self {
        Self { failures }
    }

    pub fn is_equivalent(&self) -> bool {
        self.failures.is_empty()
    }

    /// The single aggregated message enumerating every path/reason pair, or
    /// `None` when the graphs are equivalent.
    pub fn render(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut message = format!(
            "subject and expectation are not equivalent ({} difference{}):",
            self.failures.len(),
            if self.failures.len() == 1 { "" } else { "s" },
        );
        for (i, failure) in self.failures.iter().enumerate() {
            message.push_str(&format!("\n  {}) {}: {}", i + 1, failure.path, failure.message));
        }
        Some(message)
    }
}

/// Validate and raise: runs the equivalence algorithm with the given options
/// and hands the aggregated message to the sink when differences were found.
pub fn assert_equivalent(
    subject: &NodeHandle,
    expectation: &NodeHandle,
    options: &EquivalencyOptions,
    sink: &dyn FailureSink,
) {
    let failures = Validator::new(options.clone()).validate(subject, expectation);
    let report = EquivalencyReport::new(failures);
    if let Some(message) = report.render() {
        sink.raise(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatter_quotes_text_and_renders_enums_with_type_name() {
        let formatter = DisplayFormatter;
        assert_eq!(formatter.format(&NodeHandle::text("abc")), "\"abc\"");
        assert_eq!(
            formatter.format(&NodeHandle::enumeration(
                "Color",
                crate::model::Discriminant::Unsigned(2)
            )),
            "Color(2)"
        );
    }

    #[test]
    fn formatter_abbreviates_long_sequences() {
        let formatter = DisplayFormatter;
        let long = NodeHandle::sequence((0..10).map(NodeHandle::int));
        assert_eq!(formatter.format(&long), "<sequence of 10 elements>");

        let short = NodeHandle::sequence([NodeHandle::int(1), NodeHandle::int(2)]);
        assert_eq!(formatter.format(&short), "[1, 2]");
    }

    #[test]
    fn formatter_is_cycle_safe_via_depth_cap() {
        let node = NodeHandle::object("Node", []);
        node.set_member("Next", node.clone());
        // Must terminate; exact rendering is unimportant
        let _ = DisplayFormatter.format(&node);
    }

    #[test]
    fn report_renders_one_line_per_failure() {
        let report = EquivalencyReport::new(vec![
            Failure::new(&semblance_core_types::PathExpr::root().member("A"), "differs"),
            Failure::new(&semblance_core_types::PathExpr::root().member("B"), "missing"),
        ]);
        let message = report.render().unwrap();
        assert!(message.contains("2 differences"));
        assert!(message.contains("1) A: differs"));
        assert!(message.contains("2) B: missing"));
    }

    #[test]
    fn empty_report_renders_nothing() {
        assert_eq!(EquivalencyReport::new(Vec::new()).render(), None);
    }
}
