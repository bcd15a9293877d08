//! Named formula definitions that variables resolve against.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::Formula;
use crate::errors::HmlError;

/// Maps variable names to their defining formulas, in definition order.
///
/// Definitions are usually `min=`/`max=` fixed points whose bodies refer back
/// to the variable by name, which is how recursive properties are written.
#[derive(Debug, Clone, Default)]
pub struct FormulaSet {
    definitions: IndexMap<String, Arc<Formula>>,
}

impl FormulaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition, returning the previous one.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        formula: Arc<Formula>,
    ) -> Option<Arc<Formula>> {
        self.definitions.insert(name.into(), formula)
    }

    /// Define `name min= body` and return the new fixed point.
    pub fn define_min(&mut self, name: impl Into<String>, body: Arc<Formula>) -> Arc<Formula> {
        let name = name.into();
        let fixed = Formula::min_fixed_point(name.clone(), body);
        self.definitions.insert(name, Arc::clone(&fixed));
        fixed
    }

    /// Define `name max= body` and return the new fixed point.
    pub fn define_max(&mut self, name: impl Into<String>, body: Arc<Formula>) -> Arc<Formula> {
        let name = name.into();
        let fixed = Formula::max_fixed_point(name.clone(), body);
        self.definitions.insert(name, Arc::clone(&fixed));
        fixed
    }

    pub fn formula_by_name(&self, name: &str) -> Option<&Arc<Formula>> {
        self.definitions.get(name)
    }

    /// Like [`FormulaSet::formula_by_name`], but a missing definition is an
    /// [`HmlError::UndefinedVariable`].
    pub fn resolve(&self, name: &str) -> Result<&Arc<Formula>, HmlError> {
        self.formula_by_name(name)
            .ok_or_else(|| HmlError::undefined_variable(name))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Formula>)> {
        self.definitions
            .iter()
            .map(|(name, formula)| (name.as_str(), formula))
    }
}
