use semblance_core::{
    EquivalencyOptions, Failure, MemberSlot, NodeHandle, Validator,
};

/// Validate two graphs under default options and the canonical pipeline.
#[allow(dead_code)]
pub fn validate(subject: &NodeHandle, expectation: &NodeHandle) -> Vec<Failure> {
    Validator::new(EquivalencyOptions::default()).validate(subject, expectation)
}

/// Validate two graphs under the given options and the canonical pipeline.
#[allow(dead_code)]
pub fn validate_with(
    options: EquivalencyOptions,
    subject: &NodeHandle,
    expectation: &NodeHandle,
) -> Vec<Failure> {
    Validator::new(options).validate(subject, expectation)
}

/// The failure paths, in report order.
#[allow(dead_code)]
pub fn paths(failures: &[Failure]) -> Vec<&str> {
    failures.iter().map(|f| f.path.as_str()).collect()
}

/// A `Person` object with `Name` and `Age` members.
#[allow(dead_code)]
pub fn person(name: &str, age: i64) -> NodeHandle {
    NodeHandle::object(
        "Person",
        [
            MemberSlot::readable("Name", NodeHandle::text(name)),
            MemberSlot::readable("Age", NodeHandle::int(age)),
        ],
    )
}

/// A `Customer` whose `Orders` member is a sequence of `Order { Total }`.
#[allow(dead_code)]
pub fn customer_with_orders(totals: &[i64]) -> NodeHandle {
    let orders = NodeHandle::sequence(totals.iter().map(|t| {
        NodeHandle::object("Order", [MemberSlot::readable("Total", NodeHandle::int(*t))])
    }));
    NodeHandle::object("Customer", [MemberSlot::readable("Orders", orders)])
}

/// A `Node { Value, Next }` list cell with `Next` initially null; wire
/// cycles with `set_member("Next", ...)`.
#[allow(dead_code)]
pub fn list_cell(value: i64) -> NodeHandle {
    NodeHandle::object(
        "Node",
        [
            MemberSlot::readable("Value", NodeHandle::int(value)),
            MemberSlot::readable("Next", NodeHandle::unit()),
        ],
    )
}
