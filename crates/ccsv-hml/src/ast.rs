//! Immutable HML formula tree.
//!
//! Nodes are shared through [`Arc`] and never change after construction.
//! Each node draws its [`FormulaId`] from a process-wide counter when it is
//! built, so ids are unique across every tree in the process. Rendered
//! fragments refer back to nodes by id only; there is no positional
//! addressing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::actions::ActionMatcher;
use crate::dispatch::FormulaHandler;
use crate::errors::HmlError;

static NEXT_FORMULA_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique identifier of one formula node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(u64);

impl FormulaId {
    fn fresh() -> Self {
        FormulaId(NEXT_FORMULA_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        FormulaId(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One node of an HML formula.
#[derive(Debug)]
pub struct Formula {
    id: FormulaId,
    kind: FormulaKind,
}

#[derive(Debug)]
pub enum FormulaKind {
    True,
    False,
    Disjunction(Vec<Arc<Formula>>),
    Conjunction(Vec<Arc<Formula>>),
    StrongExists(Modality),
    StrongForAll(Modality),
    WeakExists(Modality),
    WeakForAll(Modality),
    MinFixedPoint(FixedPoint),
    MaxFixedPoint(FixedPoint),
    Variable(String),
}

/// Operand of the four modal operators.
#[derive(Debug)]
pub struct Modality {
    pub actions: Arc<dyn ActionMatcher>,
    pub sub: Arc<Formula>,
}

/// Binder and body of a fixed-point definition.
#[derive(Debug)]
pub struct FixedPoint {
    pub variable: String,
    pub sub: Arc<Formula>,
}

impl Formula {
    fn build(kind: FormulaKind) -> Arc<Formula> {
        Arc::new(Formula {
            id: FormulaId::fresh(),
            kind,
        })
    }

    pub fn tt() -> Arc<Formula> {
        Self::build(FormulaKind::True)
    }

    pub fn ff() -> Arc<Formula> {
        Self::build(FormulaKind::False)
    }

    pub fn disjunction(subs: Vec<Arc<Formula>>) -> Result<Arc<Formula>, HmlError> {
        if subs.is_empty() {
            return Err(HmlError::EmptyConnective {
                connective: "disjunction",
            });
        }
        Ok(Self::build(FormulaKind::Disjunction(subs)))
    }

    pub fn conjunction(subs: Vec<Arc<Formula>>) -> Result<Arc<Formula>, HmlError> {
        if subs.is_empty() {
            return Err(HmlError::EmptyConnective {
                connective: "conjunction",
            });
        }
        Ok(Self::build(FormulaKind::Conjunction(subs)))
    }

    pub fn strong_exists(actions: impl ActionMatcher + 'static, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::StrongExists(Modality::new(actions, sub)))
    }

    pub fn strong_for_all(actions: impl ActionMatcher + 'static, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::StrongForAll(Modality::new(actions, sub)))
    }

    pub fn weak_exists(actions: impl ActionMatcher + 'static, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::WeakExists(Modality::new(actions, sub)))
    }

    pub fn weak_for_all(actions: impl ActionMatcher + 'static, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::WeakForAll(Modality::new(actions, sub)))
    }

    pub fn min_fixed_point(variable: impl Into<String>, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::MinFixedPoint(FixedPoint {
            variable: variable.into(),
            sub,
        }))
    }

    pub fn max_fixed_point(variable: impl Into<String>, sub: Arc<Formula>) -> Arc<Formula> {
        Self::build(FormulaKind::MaxFixedPoint(FixedPoint {
            variable: variable.into(),
            sub,
        }))
    }

    pub fn variable(name: impl Into<String>) -> Arc<Formula> {
        Self::build(FormulaKind::Variable(name.into()))
    }

    pub fn id(&self) -> FormulaId {
        self.id
    }

    pub fn kind(&self) -> &FormulaKind {
        &self.kind
    }

    /// Invoke the handler method matching this node's variant.
    pub fn dispatch_on<H>(&self, handler: &mut H) -> H::Output
    where
        H: FormulaHandler + ?Sized,
    {
        match &self.kind {
            FormulaKind::True => handler.on_true(self),
            FormulaKind::False => handler.on_false(self),
            FormulaKind::Disjunction(subs) => handler.on_disjunction(self, subs),
            FormulaKind::Conjunction(subs) => handler.on_conjunction(self, subs),
            FormulaKind::StrongExists(modality) => handler.on_strong_exists(self, modality),
            FormulaKind::StrongForAll(modality) => handler.on_strong_for_all(self, modality),
            FormulaKind::WeakExists(modality) => handler.on_weak_exists(self, modality),
            FormulaKind::WeakForAll(modality) => handler.on_weak_for_all(self, modality),
            FormulaKind::MinFixedPoint(fixed) => handler.on_min_fixed_point(self, fixed),
            FormulaKind::MaxFixedPoint(fixed) => handler.on_max_fixed_point(self, fixed),
            FormulaKind::Variable(name) => handler.on_variable(self, name),
        }
    }

    /// Direct children in rendering order. Variables have none: their
    /// definitions live in a formula set.
    pub fn children(&self) -> &[Arc<Formula>] {
        match &self.kind {
            FormulaKind::True | FormulaKind::False | FormulaKind::Variable(_) => &[],
            FormulaKind::Disjunction(subs) | FormulaKind::Conjunction(subs) => subs,
            FormulaKind::StrongExists(modality)
            | FormulaKind::StrongForAll(modality)
            | FormulaKind::WeakExists(modality)
            | FormulaKind::WeakForAll(modality) => std::slice::from_ref(&modality.sub),
            FormulaKind::MinFixedPoint(fixed) | FormulaKind::MaxFixedPoint(fixed) => {
                std::slice::from_ref(&fixed.sub)
            }
        }
    }

    /// Body of a `min=`/`max=` definition.
    pub fn fixed_point_body(&self) -> Option<&Arc<Formula>> {
        match &self.kind {
            FormulaKind::MinFixedPoint(fixed) | FormulaKind::MaxFixedPoint(fixed) => {
                Some(&fixed.sub)
            }
            _ => None,
        }
    }

    pub fn is_disjunction(&self) -> bool {
        matches!(self.kind, FormulaKind::Disjunction(_))
    }

    pub fn is_connective(&self) -> bool {
        matches!(
            self.kind,
            FormulaKind::Disjunction(_) | FormulaKind::Conjunction(_)
        )
    }

    /// Number of nodes reachable through [`Formula::children`].
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|sub| sub.node_count())
            .sum::<usize>()
    }
}

impl Modality {
    fn new(actions: impl ActionMatcher + 'static, sub: Arc<Formula>) -> Self {
        Self {
            actions: Arc::new(actions),
            sub,
        }
    }
}

/// Whether a child must be parenthesized under its parent.
///
/// Disjunctions are wrapped under conjunctions; both connectives are wrapped
/// directly under modal and fixed-point operators.
pub(crate) fn needs_parens(parent: &FormulaKind, child: &Formula) -> bool {
    match parent {
        FormulaKind::Conjunction(_) => child.is_disjunction(),
        FormulaKind::StrongExists(_)
        | FormulaKind::StrongForAll(_)
        | FormulaKind::WeakExists(_)
        | FormulaKind::WeakForAll(_)
        | FormulaKind::MinFixedPoint(_)
        | FormulaKind::MaxFixedPoint(_) => child.is_connective(),
        FormulaKind::True
        | FormulaKind::False
        | FormulaKind::Disjunction(_)
        | FormulaKind::Variable(_) => false,
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_child = |f: &mut fmt::Formatter<'_>, child: &Formula| {
            if needs_parens(&self.kind, child) {
                write!(f, "({child})")
            } else {
                write!(f, "{child}")
            }
        };
        match &self.kind {
            FormulaKind::True => f.write_str("T"),
            FormulaKind::False => f.write_str("F"),
            FormulaKind::Disjunction(subs) | FormulaKind::Conjunction(subs) => {
                let separator = if self.is_disjunction() { " or " } else { " and " };
                for (i, sub) in subs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    write_child(f, sub)?;
                }
                Ok(())
            }
            FormulaKind::StrongExists(modality) => {
                write!(f, "<{}>", modality.actions.action_matching_string())?;
                write_child(f, &modality.sub)
            }
            FormulaKind::StrongForAll(modality) => {
                write!(f, "[{}]", modality.actions.action_matching_string())?;
                write_child(f, &modality.sub)
            }
            FormulaKind::WeakExists(modality) => {
                write!(f, "<<{}>>", modality.actions.action_matching_string())?;
                write_child(f, &modality.sub)
            }
            FormulaKind::WeakForAll(modality) => {
                write!(f, "[[{}]]", modality.actions.action_matching_string())?;
                write_child(f, &modality.sub)
            }
            FormulaKind::MinFixedPoint(fixed) => {
                write!(f, "{} min= ", fixed.variable)?;
                write_child(f, &fixed.sub)
            }
            FormulaKind::MaxFixedPoint(fixed) => {
                write!(f, "{} max= ", fixed.variable)?;
                write_child(f, &fixed.sub)
            }
            FormulaKind::Variable(name) => f.write_str(name),
        }
    }
}
