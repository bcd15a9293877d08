//! Resolve a clicked fragment id back to a direct subformula.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{FixedPoint, Formula, FormulaId, Modality};
use crate::dispatch::FormulaHandler;
use crate::errors::HmlError;
use crate::formula_set::FormulaSet;

/// Find the direct subformula of `parent` whose id is `target`.
///
/// The search is one level deep. A variable looks through its definition in
/// `formulas` and matches the body of a fixed-point definition. `Ok(None)`
/// means there is nothing further to drill into; an undefined variable is an
/// error.
pub fn locate_subformula(
    parent: &Formula,
    target: FormulaId,
    formulas: &FormulaSet,
) -> Result<Option<Arc<Formula>>, HmlError> {
    let mut locator = Locator { formulas, target };
    let found = parent.dispatch_on(&mut locator)?;
    if found.is_none() {
        debug!(parent = %parent.id(), target = %target, "no direct subformula with id");
    }
    Ok(found)
}

struct Locator<'a> {
    formulas: &'a FormulaSet,
    target: FormulaId,
}

impl Locator<'_> {
    fn among(&self, subs: &[Arc<Formula>]) -> Option<Arc<Formula>> {
        subs.iter().find(|sub| sub.id() == self.target).cloned()
    }

    fn single(&self, sub: &Arc<Formula>) -> Option<Arc<Formula>> {
        (sub.id() == self.target).then(|| Arc::clone(sub))
    }
}

impl FormulaHandler for Locator<'_> {
    type Output = Result<Option<Arc<Formula>>, HmlError>;

    fn on_true(&mut self, _formula: &Formula) -> Self::Output {
        Ok(None)
    }

    fn on_false(&mut self, _formula: &Formula) -> Self::Output {
        Ok(None)
    }

    fn on_disjunction(&mut self, _formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output {
        Ok(self.among(subs))
    }

    fn on_conjunction(&mut self, _formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output {
        Ok(self.among(subs))
    }

    fn on_strong_exists(&mut self, _formula: &Formula, modality: &Modality) -> Self::Output {
        Ok(self.single(&modality.sub))
    }

    fn on_strong_for_all(&mut self, _formula: &Formula, modality: &Modality) -> Self::Output {
        Ok(self.single(&modality.sub))
    }

    fn on_weak_exists(&mut self, _formula: &Formula, modality: &Modality) -> Self::Output {
        Ok(self.single(&modality.sub))
    }

    fn on_weak_for_all(&mut self, _formula: &Formula, modality: &Modality) -> Self::Output {
        Ok(self.single(&modality.sub))
    }

    fn on_min_fixed_point(&mut self, _formula: &Formula, fixed: &FixedPoint) -> Self::Output {
        Ok(self.single(&fixed.sub))
    }

    fn on_max_fixed_point(&mut self, _formula: &Formula, fixed: &FixedPoint) -> Self::Output {
        Ok(self.single(&fixed.sub))
    }

    fn on_variable(&mut self, _formula: &Formula, name: &str) -> Self::Output {
        let definition = self.formulas.resolve(name)?;
        Ok(definition
            .fixed_point_body()
            .and_then(|body| self.single(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionPattern;

    #[test]
    fn leaves_have_nothing_to_locate() {
        let set = FormulaSet::new();
        let t = Formula::tt();
        let f = Formula::ff();
        assert!(locate_subformula(&t, t.id(), &set).unwrap().is_none());
        assert!(locate_subformula(&f, f.id(), &set).unwrap().is_none());
    }

    #[test]
    fn connective_finds_matching_operand() {
        let a = Formula::tt();
        let b = Formula::ff();
        let b_id = b.id();
        let formula = Formula::disjunction(vec![a, b]).unwrap();
        let found = locate_subformula(&formula, b_id, &FormulaSet::new()).unwrap();
        assert_eq!(found.map(|f| f.id()), Some(b_id));
    }

    #[test]
    fn search_is_one_level_deep() {
        let deep = Formula::tt();
        let deep_id = deep.id();
        let formula = Formula::conjunction(vec![
            Formula::strong_exists(ActionPattern::Any, deep),
            Formula::ff(),
        ])
        .unwrap();
        let found = locate_subformula(&formula, deep_id, &FormulaSet::new()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn unary_operators_check_their_operand() {
        let set = FormulaSet::new();
        let body = Formula::ff();
        let body_id = body.id();
        let formula = Formula::weak_exists(ActionPattern::single("a"), body);
        let found = locate_subformula(&formula, body_id, &set).unwrap();
        assert_eq!(found.map(|f| f.id()), Some(body_id));
        assert!(locate_subformula(&formula, formula.id(), &set)
            .unwrap()
            .is_none());
    }

    #[test]
    fn fixed_point_returns_body() {
        let body = Formula::tt();
        let body_id = body.id();
        let formula = Formula::min_fixed_point("X", body);
        let found = locate_subformula(&formula, body_id, &FormulaSet::new()).unwrap();
        assert_eq!(found.map(|f| f.id()), Some(body_id));
    }

    #[test]
    fn variable_looks_through_its_definition() {
        let body = Formula::strong_for_all(ActionPattern::Any, Formula::variable("X"));
        let body_id = body.id();
        let mut set = FormulaSet::new();
        set.define_max("X", body);

        let variable = Formula::variable("X");
        let found = locate_subformula(&variable, body_id, &set).unwrap();
        assert_eq!(found.map(|f| f.id()), Some(body_id));
    }

    #[test]
    fn variable_with_non_fixed_point_definition_finds_nothing() {
        let definition = Formula::tt();
        let definition_id = definition.id();
        let mut set = FormulaSet::new();
        set.define("Y", definition);
        let found = locate_subformula(&Formula::variable("Y"), definition_id, &set).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let formula = Formula::variable("X");
        let err = locate_subformula(&formula, formula.id(), &FormulaSet::new()).unwrap_err();
        assert_eq!(err, HmlError::undefined_variable("X"));
    }

    #[test]
    fn unknown_id_finds_nothing() {
        let formula = Formula::conjunction(vec![Formula::tt(), Formula::ff()]).unwrap();
        let stranger = Formula::tt();
        let found = locate_subformula(&formula, stranger.id(), &FormulaSet::new()).unwrap();
        assert!(found.is_none());
    }
}
