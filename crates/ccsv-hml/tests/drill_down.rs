use std::sync::Arc;

use ccsv_hml::actions::ActionPattern;
use ccsv_hml::markup::selection_targets;
use ccsv_hml::selector::{SubformulaSelector, NO_MORE_MOVES};
use ccsv_hml::{locate_subformula, render_subformulas, Formula, FormulaSet, HmlError};

/// `Inv max= [-]Inv and <a>T`: "always, an `a` step is possible".
fn invariant_set() -> (FormulaSet, Arc<Formula>) {
    let mut set = FormulaSet::new();
    let body = Formula::conjunction(vec![
        Formula::strong_for_all(ActionPattern::Any, Formula::variable("Inv")),
        Formula::strong_exists(ActionPattern::single("a"), Formula::tt()),
    ])
    .unwrap();
    let fixed = set.define_max("Inv", body);
    (set, fixed)
}

/// Text content of rendered markup.
fn strip_tags(markup: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

#[test]
fn diamond_and_false_scenario() {
    let diamond = Formula::strong_exists(ActionPattern::single("a"), Formula::tt());
    let diamond_id = diamond.id();
    let formula = Formula::conjunction(vec![diamond, Formula::ff()]).unwrap();
    let set = FormulaSet::new();

    let markup = render_subformulas(&formula, &set).unwrap();

    let first = selection_targets(&markup)[0].expect("first fragment has a target");
    assert_eq!(first, diamond_id);
    let located = locate_subformula(&formula, first, &set).unwrap().unwrap();
    assert_eq!(located.to_string(), "<a>T");

    let stripped = strip_tags(&markup);
    assert_eq!(stripped, "&lt;a&gt;T and F");
}

#[test]
fn undefined_variable_produces_no_markup() {
    let result = render_subformulas(&Formula::variable("X"), &FormulaSet::new());
    assert!(matches!(result, Err(HmlError::UndefinedVariable { name }) if name == "X"));
}

#[test]
fn recursive_reference_unfolds_into_the_body() {
    let (set, fixed) = invariant_set();
    let body = Arc::clone(&fixed.children()[0]);

    // fixed point -> body
    let markup = render_subformulas(&fixed, &set).unwrap();
    assert_eq!(selection_targets(&markup), vec![Some(body.id())]);

    // body -> [-]Inv
    let unfolded = locate_subformula(&fixed, body.id(), &set).unwrap().unwrap();
    let markup = render_subformulas(&unfolded, &set).unwrap();
    let targets = selection_targets(&markup);
    assert_eq!(targets.len(), 2);
    let always = locate_subformula(&unfolded, targets[0].unwrap(), &set)
        .unwrap()
        .unwrap();
    assert_eq!(always.to_string(), "[-]Inv");

    // [-]Inv -> Inv -> body again
    let markup = render_subformulas(&always, &set).unwrap();
    let inv = locate_subformula(&always, selection_targets(&markup)[0].unwrap(), &set)
        .unwrap()
        .unwrap();
    let markup = render_subformulas(&inv, &set).unwrap();
    assert!(markup.ends_with(">Inv</span>"));
    let again = locate_subformula(&inv, selection_targets(&markup)[0].unwrap(), &set)
        .unwrap()
        .unwrap();
    assert_eq!(again.id(), body.id());
}

#[test]
fn selector_follows_clicks_to_no_more_moves() {
    let (set, _) = invariant_set();
    let mut selector = SubformulaSelector::new(set);
    selector
        .set_formula(Some(Formula::strong_exists(
            ActionPattern::single("a"),
            Formula::tt(),
        )))
        .unwrap();

    let target = selection_targets(selector.markup())[0].unwrap();
    let located = selector.drill_down(&target.to_string()).unwrap();
    assert_eq!(located.map(|f| f.to_string()), Some("T".into()));

    let located = selector.drill_down("-1").unwrap();
    assert!(located.is_none());
    assert_eq!(selector.markup(), NO_MORE_MOVES);
}
