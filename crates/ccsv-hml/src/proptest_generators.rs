//! Proptest strategies for generating HML formulas.

use std::sync::Arc;

use proptest::prelude::*;

use crate::actions::ActionPattern;
use crate::ast::Formula;
use crate::formula_set::FormulaSet;

/// Variables that [`standard_formula_set`] defines.
pub const DEFINED_VARIABLES: [&str; 3] = ["X", "Y", "Z"];

/// Definitions for the variables generated by [`arb_formula`].
///
/// - `X max= [a]T`
/// - `Y min= <b>F and T`
/// - `Z`, bound to `T` directly (not a fixed point)
///
/// Bodies do not mention variables, so drilling down always ends at a leaf.
pub fn standard_formula_set() -> FormulaSet {
    let mut set = FormulaSet::new();
    set.define_max(
        "X",
        Formula::strong_for_all(ActionPattern::single("a"), Formula::tt()),
    );
    let y_body = Formula::conjunction(vec![
        Formula::strong_exists(ActionPattern::single("b"), Formula::ff()),
        Formula::tt(),
    ])
    .unwrap_or_else(|_| Formula::tt());
    set.define_min("Y", y_body);
    set.define("Z", Formula::tt());
    set
}

pub fn arb_action_pattern() -> impl Strategy<Value = ActionPattern> {
    let label = prop_oneof![Just("a"), Just("b"), Just("tau"), Just("'c")];
    prop_oneof![
        Just(ActionPattern::Any),
        proptest::collection::vec(label.clone(), 1..=2)
            .prop_map(|labels| ActionPattern::only(labels)),
        proptest::collection::vec(label, 1..=2)
            .prop_map(|labels| ActionPattern::except(labels)),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Arc<Formula>> {
    prop_oneof![
        Just(()).prop_map(|_| Formula::tt()),
        Just(()).prop_map(|_| Formula::ff()),
        proptest::sample::select(DEFINED_VARIABLES.to_vec())
            .prop_map(|name| Formula::variable(name)),
    ]
}

/// Strategy for formulas over the variables of [`standard_formula_set`].
///
/// Every generated value is a freshly built tree, so node ids never repeat
/// inside one value.
pub fn arb_formula() -> impl Strategy<Value = Arc<Formula>> {
    arb_leaf().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..=3)
                .prop_map(|subs| Formula::disjunction(subs).unwrap_or_else(|_| Formula::ff())),
            proptest::collection::vec(inner.clone(), 1..=3)
                .prop_map(|subs| Formula::conjunction(subs).unwrap_or_else(|_| Formula::tt())),
            (arb_action_pattern(), inner.clone())
                .prop_map(|(actions, sub)| Formula::strong_exists(actions, sub)),
            (arb_action_pattern(), inner.clone())
                .prop_map(|(actions, sub)| Formula::strong_for_all(actions, sub)),
            (arb_action_pattern(), inner.clone())
                .prop_map(|(actions, sub)| Formula::weak_exists(actions, sub)),
            (arb_action_pattern(), inner.clone())
                .prop_map(|(actions, sub)| Formula::weak_for_all(actions, sub)),
            inner
                .clone()
                .prop_map(|sub| Formula::min_fixed_point("U", sub)),
            inner.prop_map(|sub| Formula::max_fixed_point("V", sub)),
        ]
    })
}
