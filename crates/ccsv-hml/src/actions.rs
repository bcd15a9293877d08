//! Transition-label sets that modal operators range over.

use std::fmt;

/// Describes which transition labels a modality quantifies over.
///
/// The rendered form is whatever the matcher reports; the renderer only adds
/// the bracket pair of the surrounding modality and escapes the text.
pub trait ActionMatcher: fmt::Debug + Send + Sync {
    fn action_matching_string(&self) -> String;
}

/// Label sets written the way the CCS workbench prints them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPattern {
    /// Every action: `-`.
    Any,
    /// An explicit list of labels: `a,b`.
    Only(Vec<String>),
    /// Every action except the listed ones: `-a,b`.
    Except(Vec<String>),
}

impl ActionPattern {
    pub fn single(label: impl Into<String>) -> Self {
        ActionPattern::Only(vec![label.into()])
    }

    pub fn only<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionPattern::Only(labels.into_iter().map(Into::into).collect())
    }

    pub fn except<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionPattern::Except(labels.into_iter().map(Into::into).collect())
    }
}

impl ActionMatcher for ActionPattern {
    fn action_matching_string(&self) -> String {
        match self {
            ActionPattern::Any => "-".to_string(),
            ActionPattern::Only(labels) => labels.join(","),
            ActionPattern::Except(labels) => format!("-{}", labels.join(",")),
        }
    }
}

impl fmt::Display for ActionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_matching_string())
    }
}
