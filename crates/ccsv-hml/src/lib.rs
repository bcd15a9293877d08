#![doc = include_str!("../README.md")]

pub mod actions;
pub mod ast;
pub mod dispatch;
pub mod errors;
pub mod formula_set;
pub mod locate;
pub mod markup;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod render;
pub mod selector;

pub use ast::{Formula, FormulaId, FormulaKind};
pub use errors::HmlError;
pub use formula_set::FormulaSet;
pub use locate::locate_subformula;
pub use render::render_subformulas;
