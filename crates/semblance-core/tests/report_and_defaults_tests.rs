//! Failure aggregation, the sink seam, and the process-wide defaults
//! lifecycle.
//!
//! The defaults tests run as a single scenario: process-wide state is shared
//! across test threads within one binary, so the lifecycle is exercised
//! sequentially in one function.

mod common;

use std::sync::Mutex;

use common::person;
use semblance_core::steps::SimpleEqualityStep;
use semblance_core::{
    assert_equivalent, defaults, DisplayFormatter, EquivalencyOptions, EquivalencyReport,
    FailureSink, Formatter, NodeHandle,
};

// ---------------------------------------------------------------------------
// Aggregated reporting and the sink
// ---------------------------------------------------------------------------

/// Sink that records raised messages instead of panicking.
#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl FailureSink for RecordingSink {
    fn raise(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[test]
fn equivalent_graphs_do_not_raise() {
    let sink = RecordingSink::default();
    assert_equivalent(
        &person("Ada", 36),
        &person("Ada", 36),
        &EquivalencyOptions::default(),
        &sink,
    );
    assert!(sink.messages.lock().unwrap().is_empty());
}

#[test]
fn non_equivalent_graphs_raise_one_aggregated_message() {
    let sink = RecordingSink::default();
    assert_equivalent(
        &person("Eva", 36),
        &person("Ada", 37),
        &EquivalencyOptions::default(),
        &sink,
    );

    let messages = sink.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("2 differences"));
    assert!(messages[0].contains("Name:"));
    assert!(messages[0].contains("Age:"));
}

#[test]
#[should_panic(expected = "not equivalent")]
fn the_panic_sink_raises_through_panic() {
    assert_equivalent(
        &NodeHandle::int(1),
        &NodeHandle::int(2),
        &EquivalencyOptions::default(),
        &semblance_core::PanicSink,
    );
}

#[test]
fn report_render_enumerates_every_path_reason_pair() {
    let failures = common::validate(&person("Eva", 36), &person("Ada", 37));
    let report = EquivalencyReport::new(failures);

    assert!(!report.is_equivalent());
    let message = report.render().unwrap();
    assert!(message.contains("1) Name:"));
    assert!(message.contains("2) Age:"));
}

#[test]
fn the_formatter_renders_values_in_messages() {
    let failures = common::validate(&NodeHandle::text("eva"), &NodeHandle::text("ada"));
    assert!(failures[0].message.contains("\"ada\""));
    assert!(failures[0].message.contains("\"eva\""));

    // Formatter output never affects the verdict; it is display-only
    let rendered = DisplayFormatter.format(&NodeHandle::text("ada"));
    assert_eq!(rendered, "\"ada\"");
}

#[test]
fn a_custom_formatter_replaces_value_rendering() {
    struct TypeOnlyFormatter;

    impl Formatter for TypeOnlyFormatter {
        fn format(&self, node: &NodeHandle) -> String {
            format!("<{}>", node.type_label())
        }
    }

    let validator = semblance_core::Validator::new(EquivalencyOptions::default())
        .with_formatter(std::sync::Arc::new(TypeOnlyFormatter));
    let failures = validator.validate(&NodeHandle::int(1), &NodeHandle::text("ada"));

    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("<text>"));
    assert!(!failures[0].message.contains("ada"));
}

// ---------------------------------------------------------------------------
// Process-wide defaults lifecycle
// ---------------------------------------------------------------------------

#[test]
fn defaults_snapshot_configure_restore_lifecycle() {
    // Fresh state
    defaults::restore_defaults();

    let subject = person("Ada", 36);
    let expectation = person("Ada", 99);
    assert_eq!(defaults::validate_with_defaults(&subject, &expectation).len(), 1);

    // Reconfigure: exclude Age globally
    defaults::configure(|globals| {
        globals.options = EquivalencyOptions::builder().excluding_member("Age").build();
    });
    assert!(defaults::validate_with_defaults(&subject, &expectation).is_empty());

    // A snapshot taken now is immune to later mutation
    let snapshot = defaults::snapshot();
    defaults::configure(|globals| {
        globals.pipeline.remove::<SimpleEqualityStep>();
    });
    let frozen = semblance_core::Validator::with_steps(snapshot.options, snapshot.steps);
    assert!(frozen.validate(&subject, &expectation).is_empty());

    // The mutated globals now fail closed on scalar leaves
    let failures = defaults::validate_with_defaults(&NodeHandle::int(1), &NodeHandle::int(1));
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("no comparison step"));

    // Restore brings back the canonical options and pipeline
    defaults::restore_defaults();
    assert_eq!(defaults::validate_with_defaults(&subject, &expectation).len(), 1);
    assert!(defaults::validate_with_defaults(&NodeHandle::int(1), &NodeHandle::int(1)).is_empty());
}
