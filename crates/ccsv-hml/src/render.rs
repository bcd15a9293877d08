//! Interactive rendering of formulas.
//!
//! A render pass turns a formula into markup in which only the fragments
//! produced by the root node are clickable. Each clickable span carries the
//! id of the node a click should drill into: for connectives every operand is
//! its own span, for modal and fixed-point operators the whole rendering is
//! one span targeting the body. Everything below the root renders as plain
//! text, so a user drills one operator per click: the selected subformula is
//! located (see [`crate::locate`]) and rendered again with a fresh pass.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{needs_parens, FixedPoint, Formula, FormulaKind, Modality};
use crate::dispatch::FormulaHandler;
use crate::errors::HmlError;
use crate::formula_set::FormulaSet;
use crate::markup::{clickable, escape, parenthesize};

/// Render `formula` with its top-level fragments made clickable.
///
/// Fails with [`HmlError::UndefinedVariable`] if any variable in the tree has
/// no definition in `formulas`.
pub fn render_subformulas(formula: &Formula, formulas: &FormulaSet) -> Result<String, HmlError> {
    let mut pass = RenderPass {
        formulas,
        first: true,
    };
    formula.dispatch_on(&mut pass)
}

/// State of one render call. `first` is consumed by the root node.
struct RenderPass<'a> {
    formulas: &'a FormulaSet,
    first: bool,
}

impl RenderPass<'_> {
    fn take_first(&mut self) -> bool {
        std::mem::replace(&mut self.first, false)
    }

    fn render_connective(
        &mut self,
        formula: &Formula,
        subs: &[Arc<Formula>],
        separator: &str,
    ) -> Result<String, HmlError> {
        let first = self.take_first();
        let mut parts = Vec::with_capacity(subs.len());
        for sub in subs {
            let text = parenthesize(sub.dispatch_on(self)?, needs_parens(formula.kind(), sub));
            parts.push(if first {
                clickable(Some(sub.id()), &text)
            } else {
                text
            });
        }
        Ok(parts.join(separator))
    }

    fn render_modal(
        &mut self,
        formula: &Formula,
        modality: &Modality,
        open: &str,
        close: &str,
    ) -> Result<String, HmlError> {
        let first = self.take_first();
        let sub = modality.sub.dispatch_on(self)?;
        let actions = format!("{open}{}{close}", modality.actions.action_matching_string());
        let text = format!(
            "{}{}",
            escape(&actions),
            parenthesize(sub, needs_parens(formula.kind(), &modality.sub))
        );
        Ok(self.finish(first, &modality.sub, text))
    }

    fn render_fixed_point(
        &mut self,
        formula: &Formula,
        fixed: &FixedPoint,
        keyword: &str,
    ) -> Result<String, HmlError> {
        let first = self.take_first();
        let sub = fixed.sub.dispatch_on(self)?;
        let text = format!(
            "{} {keyword} {}",
            escape(&fixed.variable),
            parenthesize(sub, needs_parens(formula.kind(), &fixed.sub))
        );
        Ok(self.finish(first, &fixed.sub, text))
    }

    fn render_constant(&mut self, literal: &str) -> String {
        if self.take_first() {
            clickable(None, literal)
        } else {
            literal.to_string()
        }
    }

    fn finish(&self, first: bool, target: &Formula, text: String) -> String {
        if first {
            clickable(Some(target.id()), &text)
        } else {
            text
        }
    }
}

impl FormulaHandler for RenderPass<'_> {
    type Output = Result<String, HmlError>;

    fn on_true(&mut self, _formula: &Formula) -> Self::Output {
        Ok(self.render_constant("T"))
    }

    fn on_false(&mut self, _formula: &Formula) -> Self::Output {
        Ok(self.render_constant("F"))
    }

    fn on_disjunction(&mut self, formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output {
        self.render_connective(formula, subs, " or ")
    }

    fn on_conjunction(&mut self, formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output {
        self.render_connective(formula, subs, " and ")
    }

    fn on_strong_exists(&mut self, formula: &Formula, modality: &Modality) -> Self::Output {
        self.render_modal(formula, modality, "<", ">")
    }

    fn on_strong_for_all(&mut self, formula: &Formula, modality: &Modality) -> Self::Output {
        self.render_modal(formula, modality, "[", "]")
    }

    fn on_weak_exists(&mut self, formula: &Formula, modality: &Modality) -> Self::Output {
        self.render_modal(formula, modality, "<<", ">>")
    }

    fn on_weak_for_all(&mut self, formula: &Formula, modality: &Modality) -> Self::Output {
        self.render_modal(formula, modality, "[[", "]]")
    }

    fn on_min_fixed_point(&mut self, formula: &Formula, fixed: &FixedPoint) -> Self::Output {
        self.render_fixed_point(formula, fixed, "min=")
    }

    fn on_max_fixed_point(&mut self, formula: &Formula, fixed: &FixedPoint) -> Self::Output {
        self.render_fixed_point(formula, fixed, "max=")
    }

    fn on_variable(&mut self, _formula: &Formula, name: &str) -> Self::Output {
        let first = self.take_first();
        let definition = self.formulas.resolve(name)?;
        let text = escape(name).into_owned();
        match definition.fixed_point_body() {
            Some(body) if first => Ok(clickable(Some(body.id()), &text)),
            None if first => {
                debug!(variable = name, "variable is not bound by a fixed point");
                Ok(text)
            }
            _ => Ok(text),
        }
    }
}

/// Whether `formula` renders any clickable fragment with a target.
pub fn has_drill_down(formula: &Formula, formulas: &FormulaSet) -> Result<bool, HmlError> {
    match formula.kind() {
        FormulaKind::True | FormulaKind::False => Ok(false),
        FormulaKind::Variable(name) => Ok(formulas.resolve(name)?.fixed_point_body().is_some()),
        _ => Ok(true),
    }
}
