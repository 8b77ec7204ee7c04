//! Cycle safety: self-referencing and mutually-referencing graphs must
//! terminate and be reported equivalent once consistent.

mod common;

use common::{list_cell, paths, validate};

#[test]
fn self_referencing_subject_and_expectation_are_equivalent() {
    // subject.Next == subject, expectation.Next == expectation
    let subject = list_cell(1);
    subject.set_member("Next", subject.clone());
    let expectation = list_cell(1);
    expectation.set_member("Next", expectation.clone());

    assert!(validate(&subject, &expectation).is_empty());
}

#[test]
fn a_cyclic_graph_is_equivalent_to_itself() {
    let graph = list_cell(1);
    graph.set_member("Next", graph.clone());

    assert!(validate(&graph, &graph).is_empty());
}

#[test]
fn two_cell_cycles_are_equivalent() {
    // a1 -> a2 -> a1 versus b1 -> b2 -> b1
    let a1 = list_cell(1);
    let a2 = list_cell(2);
    a1.set_member("Next", a2.clone());
    a2.set_member("Next", a1.clone());

    let b1 = list_cell(1);
    let b2 = list_cell(2);
    b1.set_member("Next", b2.clone());
    b2.set_member("Next", b1.clone());

    assert!(validate(&a1, &b1).is_empty());
}

#[test]
fn value_mismatch_inside_a_cycle_is_still_detected() {
    let a1 = list_cell(1);
    let a2 = list_cell(2);
    a1.set_member("Next", a2.clone());
    a2.set_member("Next", a1.clone());

    let b1 = list_cell(1);
    let b2 = list_cell(99);
    b1.set_member("Next", b2.clone());
    b2.set_member("Next", b1.clone());

    let failures = validate(&a1, &b1);
    assert_eq!(paths(&failures), vec!["Next.Value"]);
}

#[test]
fn cycle_detection_is_branch_local() {
    // The same pair reached through two sibling branches is compared in
    // both; only a pair on the current recursion stack short-circuits.
    let shared_a = list_cell(7);
    let parent_a = list_cell(0);
    parent_a.set_member("Left", shared_a.clone());
    parent_a.set_member("Right", shared_a.clone());

    let shared_b = list_cell(8);
    let parent_b = list_cell(0);
    parent_b.set_member("Left", shared_b.clone());
    parent_b.set_member("Right", shared_b.clone());

    let failures = validate(&parent_a, &parent_b);
    // Both branches report the mismatch independently
    assert_eq!(paths(&failures), vec!["Left.Value", "Right.Value"]);
}

#[test]
fn deep_acyclic_chain_compares_without_cycle_interference() {
    let head_a = list_cell(0);
    let head_b = list_cell(0);
    let mut tail_a = head_a.clone();
    let mut tail_b = head_b.clone();
    for value in 1..200 {
        let next_a = list_cell(value);
        let next_b = list_cell(value);
        tail_a.set_member("Next", next_a.clone());
        tail_b.set_member("Next", next_b.clone());
        tail_a = next_a;
        tail_b = next_b;
    }

    assert!(validate(&head_a, &head_b).is_empty());
}
