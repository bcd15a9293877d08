use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building, rendering, or navigating HML formulas.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum HmlError {
    #[error("HML variable {name} has no definition")]
    #[diagnostic(
        code(ccsv::hml::undefined_variable),
        help("add a definition for the variable to the formula set")
    )]
    UndefinedVariable { name: String },

    #[error("{connective} needs at least one subformula")]
    #[diagnostic(code(ccsv::hml::empty_connective))]
    EmptyConnective { connective: &'static str },

    #[error("malformed subformula selection '{raw}'")]
    #[diagnostic(
        code(ccsv::hml::malformed_selection),
        help("selections are formula ids or -1 for a leaf")
    )]
    MalformedSelection { raw: String },
}

impl HmlError {
    pub fn undefined_variable(name: impl Into<String>) -> Self {
        HmlError::UndefinedVariable { name: name.into() }
    }
}
