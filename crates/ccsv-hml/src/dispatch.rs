//! Per-variant handler protocol for formula traversal.
//!
//! [`Formula::dispatch_on`](crate::ast::Formula::dispatch_on) calls exactly
//! one method of a [`FormulaHandler`], the one matching the node's variant.
//! Every method is required, so a new formula variant fails to compile until
//! each handler covers it.

use std::sync::Arc;

use crate::ast::{FixedPoint, Formula, Modality};

pub trait FormulaHandler {
    type Output;

    fn on_true(&mut self, formula: &Formula) -> Self::Output;

    fn on_false(&mut self, formula: &Formula) -> Self::Output;

    fn on_disjunction(&mut self, formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output;

    fn on_conjunction(&mut self, formula: &Formula, subs: &[Arc<Formula>]) -> Self::Output;

    fn on_strong_exists(&mut self, formula: &Formula, modality: &Modality) -> Self::Output;

    fn on_strong_for_all(&mut self, formula: &Formula, modality: &Modality) -> Self::Output;

    fn on_weak_exists(&mut self, formula: &Formula, modality: &Modality) -> Self::Output;

    fn on_weak_for_all(&mut self, formula: &Formula, modality: &Modality) -> Self::Output;

    fn on_min_fixed_point(&mut self, formula: &Formula, fixed: &FixedPoint) -> Self::Output;

    fn on_max_fixed_point(&mut self, formula: &Formula, fixed: &FixedPoint) -> Self::Output;

    fn on_variable(&mut self, formula: &Formula, name: &str) -> Self::Output;
}
