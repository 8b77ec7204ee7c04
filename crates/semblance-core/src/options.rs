//! Per-run configuration: selection, matching, and ordering rules, per-type
//! overrides, scalar tolerances, and the value-type predicate
//!
//! [`EquivalencyOptions`] is a snapshot: logically immutable once a traversal
//! starts, cheap to clone (rule functions sit behind `Arc`). Per-call
//! adjustments produce a new snapshot via [`OptionsBuilder`]; the ambient
//! options of a running traversal are never mutated.

use std::sync::Arc;

use semblance_core_types::PathExpr;

use crate::model::{NodeHandle, Scalar, ScalarKind};

/// Decides whether one expectation member participates in comparison.
pub type SelectionPredicate = Arc<dyn Fn(&str, &PathExpr) -> bool + Send + Sync>;

/// Pairs an expectation member name with a subject member name.
pub type MatchingFn = Arc<dyn Fn(&str, &[String]) -> MatchOutcome + Send + Sync>;

/// Decides order sensitivity for the collection at a path; `None` defers.
pub type OrderingFn = Arc<dyn Fn(&PathExpr) -> Option<bool> + Send + Sync>;

/// Matches a type label for overrides and the value-type predicate.
pub type TypePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Custom whole-node comparison for an overridden type.
pub type NodeComparer = Arc<dyn Fn(&NodeHandle, &NodeHandle) -> bool + Send + Sync>;

/// Custom scalar comparison (e.g. approximate float equality).
pub type ScalarComparer = Arc<dyn Fn(&Scalar, &Scalar) -> bool + Send + Sync>;

/// One matching rule's verdict for an expectation member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Pair with this subject member name
    Matched(String),
    /// The member is declared optional; its absence is not a failure
    Optional,
    /// This rule has no opinion; later rules (or the default) decide
    NoDecision,
}

/// The resolved pairing for an expectation member after all matching rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberMatch {
    Matched(String),
    Optional,
    Missing,
}

#[derive(Clone)]
struct SelectionRule {
    name: String,
    predicate: SelectionPredicate,
}

#[derive(Clone)]
struct MatchingRule {
    name: String,
    apply: MatchingFn,
}

#[derive(Clone)]
struct OrderingRule {
    name: String,
    apply: OrderingFn,
}

/// Custom comparison delegate keyed by a predicate-matched type label.
#[derive(Clone)]
pub struct TypeOverride {
    label: String,
    applies: TypePredicate,
    compare: NodeComparer,
}

impl TypeOverride {
    /// Human-readable label for messages and debugging.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the custom comparison.
    pub fn compare(&self, subject: &NodeHandle, expectation: &NodeHandle) -> bool {
        (self.compare)(subject, expectation)
    }
}

/// Immutable-per-run configuration snapshot for one traversal.
#[derive(Clone, Default)]
pub struct EquivalencyOptions {
    selection_rules: Vec<SelectionRule>,
    matching_rules: Vec<MatchingRule>,
    ordering_rules: Vec<OrderingRule>,
    type_overrides: Vec<TypeOverride>,
    scalar_comparers: Vec<(ScalarKind, ScalarComparer)>,
    value_type_predicates: Vec<TypePredicate>,
}

impl EquivalencyOptions {
    /// Start building a fresh options snapshot.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Rebuild from an existing snapshot (per-call override of defaults).
    pub fn to_builder(&self) -> OptionsBuilder {
        OptionsBuilder {
            options: self.clone(),
        }
    }

    /// True when every selection rule accepts the member.
    pub fn selects(&self, member_name: &str, owner_path: &PathExpr) -> bool {
        self.selection_rules
            .iter()
            .all(|rule| (rule.predicate)(member_name, owner_path))
    }

    /// Resolve the subject member paired with an expectation member.
    ///
    /// The first decisive matching rule wins; when no rule decides, the
    /// default is an exact, case-sensitive name match.
    pub fn match_member(&self, expectation_name: &str, subject_names: &[String]) -> MemberMatch {
        for rule in &self.matching_rules {
            match (rule.apply)(expectation_name, subject_names) {
                MatchOutcome::Matched(name) => return MemberMatch::Matched(name),
                MatchOutcome::Optional => return MemberMatch::Optional,
                MatchOutcome::NoDecision => continue,
            }
        }
        if subject_names.iter().any(|n| n == expectation_name) {
            MemberMatch::Matched(expectation_name.to_string())
        } else {
            MemberMatch::Missing
        }
    }

    /// Whether the collection at `path` is compared order-sensitively.
    /// The first ordering rule with an opinion wins; the default is strict.
    pub fn ordered_at(&self, path: &PathExpr) -> bool {
        self.ordering_rules
            .iter()
            .find_map(|rule| (rule.apply)(path))
            .unwrap_or(true)
    }

    /// First type override whose predicate matches the given type label.
    pub fn override_for(&self, type_label: &str) -> Option<&TypeOverride> {
        self.type_overrides
            .iter()
            .find(|o| (o.applies)(type_label))
    }

    /// Custom comparer registered for a scalar kind, if any.
    pub fn scalar_comparer(&self, kind: ScalarKind) -> Option<&ScalarComparer> {
        self.scalar_comparers
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, comparer)| comparer)
    }

    /// True when the value-type predicate declares this object type atomic:
    /// it is then compared exactly instead of member by member.
    pub fn is_value_type(&self, type_name: &str) -> bool {
        self.value_type_predicates.iter().any(|p| p(type_name))
    }

    fn rule_names(rules: &[impl HasName]) -> Vec<&str> {
        rules.iter().map(|r| r.rule_name()).collect()
    }
}

trait HasName {
    fn rule_name(&self) -> &str;
}

impl HasName for SelectionRule {
    fn rule_name(&self) -> &str {
        &self.name
    }
}

impl HasName for MatchingRule {
    fn rule_name(&self) -> &str {
        &self.name
    }
}

impl HasName for OrderingRule {
    fn rule_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for EquivalencyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquivalencyOptions")
            .field("selection_rules", &Self::rule_names(&self.selection_rules))
            .field("matching_rules", &Self::rule_names(&self.matching_rules))
            .field("ordering_rules", &Self::rule_names(&self.ordering_rules))
            .field(
                "type_overrides",
                &self
                    .type_overrides
                    .iter()
                    .map(|o| o.label.as_str())
                    .collect::<Vec<_>>(),
            )
            .field(
                "scalar_comparers",
                &self
                    .scalar_comparers
                    .iter()
                    .map(|(k, _)| k.label())
                    .collect::<Vec<_>>(),
            )
            .field("value_type_predicates", &self.value_type_predicates.len())
            .finish()
    }
}

/// Fluent builder for [`EquivalencyOptions`].
#[derive(Debug, Default, Clone)]
pub struct OptionsBuilder {
    options: EquivalencyOptions,
}

impl OptionsBuilder {
    /// Add a named selection rule; all selection rules must accept a member.
    pub fn with_selection_rule(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&str, &PathExpr) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.options.selection_rules.push(SelectionRule {
            name: name.into(),
            predicate: Arc::new(predicate),
        });
        self
    }

    /// Exclude the member at an exact path (e.g. `Orders[2].Total` excludes
    /// only that position; `Total` excludes the root member).
    pub fn excluding(self, path: &str) -> Self {
        let excluded = path.to_string();
        let name = format!("exclude path `{}`", path);
        self.with_selection_rule(name, move |member, owner| {
            owner.member(member).as_str() != excluded
        })
    }

    /// Exclude every member with this name, at any depth.
    pub fn excluding_member(self, member_name: &str) -> Self {
        let excluded = member_name.to_string();
        let name = format!("exclude member `{}`", member_name);
        self.with_selection_rule(name, move |member, _| member != excluded)
    }

    /// Add a named matching rule; the first decisive rule wins.
    pub fn with_matching_rule(
        mut self,
        name: impl Into<String>,
        apply: impl Fn(&str, &[String]) -> MatchOutcome + Send + Sync + 'static,
    ) -> Self {
        self.options.matching_rules.push(MatchingRule {
            name: name.into(),
            apply: Arc::new(apply),
        });
        self
    }

    /// Pair members by name ignoring ASCII case.
    pub fn matching_members_case_insensitively(self) -> Self {
        self.with_matching_rule("case-insensitive name match", |expectation, subjects| {
            subjects
                .iter()
                .find(|s| s.eq_ignore_ascii_case(expectation))
                .map(|s| MatchOutcome::Matched(s.clone()))
                .unwrap_or(MatchOutcome::NoDecision)
        })
    }

    /// Declare a member optional: absence on the subject side is not a
    /// failure. Presence still compares normally.
    pub fn treating_member_as_optional(self, member_name: &str) -> Self {
        let optional = member_name.to_string();
        let name = format!("optional member `{}`", member_name);
        self.with_matching_rule(name, move |expectation, subjects| {
            if expectation == optional && !subjects.iter().any(|s| s == expectation) {
                MatchOutcome::Optional
            } else {
                MatchOutcome::NoDecision
            }
        })
    }

    /// Add a named ordering rule; the first rule with an opinion wins.
    pub fn with_ordering_rule(
        mut self,
        name: impl Into<String>,
        apply: impl Fn(&PathExpr) -> Option<bool> + Send + Sync + 'static,
    ) -> Self {
        self.options.ordering_rules.push(OrderingRule {
            name: name.into(),
            apply: Arc::new(apply),
        });
        self
    }

    /// Compare every collection as a multiset (order-insensitive).
    pub fn comparing_unordered(self) -> Self {
        self.with_ordering_rule("all collections unordered", |_| Some(false))
    }

    /// Compare the collection at one exact path as a multiset.
    pub fn comparing_unordered_at(self, path: &str) -> Self {
        let unordered = path.to_string();
        let name = format!("unordered at `{}`", path);
        self.with_ordering_rule(name, move |p| {
            if p.as_str() == unordered {
                Some(false)
            } else {
                None
            }
        })
    }

    /// Register a custom comparison for every node whose type label matches
    /// the predicate; it short-circuits the step pipeline for those nodes.
    pub fn using_comparison(
        mut self,
        label: impl Into<String>,
        applies: impl Fn(&str) -> bool + Send + Sync + 'static,
        compare: impl Fn(&NodeHandle, &NodeHandle) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.options.type_overrides.push(TypeOverride {
            label: label.into(),
            applies: Arc::new(applies),
            compare: Arc::new(compare),
        });
        self
    }

    /// `Using(comparer).WhenTypeIs(name)` convenience for a single type name.
    pub fn using_comparison_for_type(
        self,
        type_name: &str,
        compare: impl Fn(&NodeHandle, &NodeHandle) -> bool + Send + Sync + 'static,
    ) -> Self {
        let name = type_name.to_string();
        let label = format!("override for `{}`", type_name);
        self.using_comparison(label, move |t| t == name, compare)
    }

    /// Register an approximate comparer for one scalar kind; it replaces the
    /// exact-equality check for that kind everywhere it recurs.
    pub fn with_scalar_comparer(
        mut self,
        kind: ScalarKind,
        compare: impl Fn(&Scalar, &Scalar) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.options
            .scalar_comparers
            .retain(|(k, _)| *k != kind);
        self.options.scalar_comparers.push((kind, Arc::new(compare)));
        self
    }

    /// Floats within `epsilon` of each other are equivalent.
    pub fn with_float_tolerance(self, epsilon: f64) -> Self {
        self.with_scalar_comparer(ScalarKind::Float, move |a, b| match (a, b) {
            (Scalar::Float(x), Scalar::Float(y)) => (x - y).abs() <= epsilon,
            _ => false,
        })
    }

    /// Add a value-type predicate: matched object types are treated as
    /// atomic values instead of being decomposed into members.
    pub fn comparing_by_value(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.options.value_type_predicates.push(Arc::new(predicate));
        self
    }

    /// Treat one named object type as an atomic value.
    pub fn comparing_type_by_value(self, type_name: &str) -> Self {
        let name = type_name.to_string();
        self.comparing_by_value(move |t| t == name)
    }

    /// Finish the snapshot.
    pub fn build(self) -> EquivalencyOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matching_is_exact_and_case_sensitive() {
        let options = EquivalencyOptions::default();
        let subjects = vec!["Total".to_string(), "total".to_string()];

        assert_eq!(
            options.match_member("Total", &subjects),
            MemberMatch::Matched("Total".to_string())
        );
        assert_eq!(options.match_member("TOTAL", &subjects), MemberMatch::Missing);
    }

    #[test]
    fn case_insensitive_rule_wins_over_default() {
        let options = EquivalencyOptions::builder()
            .matching_members_case_insensitively()
            .build();
        let subjects = vec!["total".to_string()];

        assert_eq!(
            options.match_member("Total", &subjects),
            MemberMatch::Matched("total".to_string())
        );
    }

    #[test]
    fn exclusion_rules_are_conjunctive() {
        let options = EquivalencyOptions::builder()
            .excluding_member("Secret")
            .excluding("Orders.Internal")
            .build();

        let root = PathExpr::root();
        let orders = root.member("Orders");
        assert!(!options.selects("Secret", &root));
        assert!(!options.selects("Secret", &orders));
        assert!(!options.selects("Internal", &orders));
        assert!(options.selects("Internal", &root));
        assert!(options.selects("Total", &orders));
    }

    #[test]
    fn ordering_defaults_to_strict_and_first_opinion_wins() {
        let options = EquivalencyOptions::builder()
            .comparing_unordered_at("Tags")
            .build();

        assert!(!options.ordered_at(&PathExpr::root().member("Tags")));
        assert!(options.ordered_at(&PathExpr::root().member("Orders")));
    }

    #[test]
    fn to_builder_extends_a_snapshot_without_mutating_it() {
        let base = EquivalencyOptions::builder().excluding_member("Secret").build();
        let extended = base.to_builder().excluding_member("Internal").build();

        let root = PathExpr::root();
        assert!(!extended.selects("Secret", &root));
        assert!(!extended.selects("Internal", &root));
        assert!(base.selects("Internal", &root));
    }

    #[test]
    fn scalar_comparer_registration_replaces_prior_kind_entry() {
        let options = EquivalencyOptions::builder()
            .with_float_tolerance(0.5)
            .with_float_tolerance(0.001)
            .build();

        let comparer = options.scalar_comparer(ScalarKind::Float).unwrap();
        assert!(!comparer(&Scalar::Float(1.0), &Scalar::Float(1.1)));
        assert!(comparer(&Scalar::Float(1.0), &Scalar::Float(1.0005)));
    }
}
