//! Drill-down state for exploring a formula one operator at a time.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::Formula;
use crate::errors::HmlError;
use crate::formula_set::FormulaSet;
use crate::locate::locate_subformula;
use crate::markup::parse_selection;
use crate::render::render_subformulas;

/// Shown when there is no formula left to explore.
pub const NO_MORE_MOVES: &str = "No more moves";

pub type SelectListener = Box<dyn FnMut(Option<&Arc<Formula>>) + Send>;

/// Holds the formula currently on display and its rendered markup.
///
/// A click on a rendered fragment is fed to [`SubformulaSelector::select`],
/// which locates the chosen subformula and reports it to the listener. The
/// listener's owner decides whether to show it next.
pub struct SubformulaSelector {
    formulas: FormulaSet,
    current: Option<Arc<Formula>>,
    markup: String,
    on_select: Option<SelectListener>,
}

impl SubformulaSelector {
    pub fn new(formulas: FormulaSet) -> Self {
        Self {
            formulas,
            current: None,
            markup: NO_MORE_MOVES.to_string(),
            on_select: None,
        }
    }

    pub fn set_formula_set(&mut self, formulas: FormulaSet) {
        self.formulas = formulas;
    }

    pub fn formula_set(&self) -> &FormulaSet {
        &self.formulas
    }

    /// Show `formula`, or [`NO_MORE_MOVES`] for `None`.
    ///
    /// On a render error the previous state is kept.
    pub fn set_formula(&mut self, formula: Option<Arc<Formula>>) -> Result<(), HmlError> {
        match formula {
            Some(formula) => {
                self.markup = render_subformulas(&formula, &self.formulas)?;
                self.current = Some(formula);
            }
            None => {
                self.markup = NO_MORE_MOVES.to_string();
                self.current = None;
            }
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&Arc<Formula>> {
        self.current.as_ref()
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn set_select_listener<F>(&mut self, listener: F)
    where
        F: FnMut(Option<&Arc<Formula>>) + Send + 'static,
    {
        self.on_select = Some(Box::new(listener));
    }

    /// Handle a click on a fragment tagged with `raw_id`.
    pub fn select(&mut self, raw_id: &str) -> Result<Option<Arc<Formula>>, HmlError> {
        let target = parse_selection(raw_id)?;
        let located = match (&self.current, target) {
            (Some(current), Some(target)) => locate_subformula(current, target, &self.formulas)?,
            _ => None,
        };
        debug!(
            selection = raw_id,
            found = located.is_some(),
            "subformula selected"
        );
        if let Some(listener) = self.on_select.as_mut() {
            listener(located.as_ref());
        }
        Ok(located)
    }

    /// Select and immediately show the result.
    pub fn drill_down(&mut self, raw_id: &str) -> Result<Option<Arc<Formula>>, HmlError> {
        let located = self.select(raw_id)?;
        self.set_formula(located.clone())?;
        Ok(located)
    }
}

impl fmt::Debug for SubformulaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubformulaSelector")
            .field("formulas", &self.formulas)
            .field("current", &self.current.as_ref().map(|c| c.id()))
            .field("markup", &self.markup)
            .field("has_listener", &self.on_select.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionPattern;
    use crate::markup::selection_targets;
    use std::sync::Mutex;

    #[test]
    fn starts_with_no_more_moves() {
        let selector = SubformulaSelector::new(FormulaSet::new());
        assert_eq!(selector.markup(), NO_MORE_MOVES);
        assert!(selector.current().is_none());
    }

    #[test]
    fn clearing_the_formula_shows_no_more_moves() {
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        selector.set_formula(Some(Formula::tt())).unwrap();
        assert_ne!(selector.markup(), NO_MORE_MOVES);
        selector.set_formula(None).unwrap();
        assert_eq!(selector.markup(), NO_MORE_MOVES);
    }

    #[test]
    fn render_error_keeps_previous_state() {
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        let shown = Formula::tt();
        let shown_id = shown.id();
        selector.set_formula(Some(shown)).unwrap();
        let before = selector.markup().to_string();

        let err = selector
            .set_formula(Some(Formula::variable("Nowhere")))
            .unwrap_err();

        assert_eq!(err, HmlError::undefined_variable("Nowhere"));
        assert_eq!(selector.markup(), before);
        assert_eq!(selector.current().map(|c| c.id()), Some(shown_id));
    }

    #[test]
    fn select_notifies_listener_with_located_subformula() {
        let body = Formula::ff();
        let body_id = body.id();
        let formula = Formula::strong_for_all(ActionPattern::single("a"), body);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        selector.set_select_listener(move |found| {
            sink.lock().unwrap().push(found.map(|f| f.id()));
        });
        selector.set_formula(Some(formula)).unwrap();

        let located = selector.select(&body_id.to_string()).unwrap();

        assert_eq!(located.map(|f| f.id()), Some(body_id));
        assert_eq!(*seen.lock().unwrap(), vec![Some(body_id)]);
    }

    #[test]
    fn leaf_selection_finds_nothing() {
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        selector.set_formula(Some(Formula::tt())).unwrap();
        assert!(selector.select("-1").unwrap().is_none());
    }

    #[test]
    fn malformed_selection_is_an_error() {
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        selector.set_formula(Some(Formula::tt())).unwrap();
        assert!(matches!(
            selector.select("abc"),
            Err(HmlError::MalformedSelection { .. })
        ));
    }

    #[test]
    fn drill_down_walks_to_a_leaf() {
        let formula = Formula::strong_exists(
            ActionPattern::single("a"),
            Formula::weak_for_all(ActionPattern::single("b"), Formula::tt()),
        );
        let mut selector = SubformulaSelector::new(FormulaSet::new());
        selector.set_formula(Some(formula)).unwrap();

        let mut steps = 0;
        loop {
            let targets = selection_targets(selector.markup());
            let Some(Some(target)) = targets.first().copied() else {
                break;
            };
            selector.drill_down(&target.to_string()).unwrap();
            steps += 1;
        }

        assert_eq!(steps, 2);
        assert_eq!(selector.current().map(|c| c.to_string()), Some("T".into()));
    }
}
