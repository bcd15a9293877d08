use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Three-valued answer of a verification task.
///
/// `Unknown` covers "never run", "invalidated by an edit", "aborted", and
/// "the engine did not give a boolean answer"; these are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Satisfiability {
    #[default]
    Unknown,
    Satisfied,
    Unsatisfied,
}

impl Satisfiability {
    /// Interpret the `result` field of an engine reply.
    pub fn from_result(result: &Value) -> Self {
        match result {
            Value::Bool(answer) => Self::from(*answer),
            _ => Satisfiability::Unknown,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Satisfiability::Unknown => None,
            Satisfiability::Satisfied => Some(true),
            Satisfiability::Unsatisfied => Some(false),
        }
    }

    pub fn is_known(self) -> bool {
        self != Satisfiability::Unknown
    }

    /// Icon markup for the property list.
    pub fn indicator_markup(self) -> &'static str {
        match self {
            Satisfiability::Unknown => "<i class=\"fa fa-question\"></i>",
            Satisfiability::Satisfied => "<i class=\"fa fa-check\"></i>",
            Satisfiability::Unsatisfied => "<i class=\"fa fa-times\"></i>",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Satisfiability::Unknown => "undetermined",
            Satisfiability::Satisfied => "satisfied",
            Satisfiability::Unsatisfied => "not satisfied",
        }
    }
}

impl From<bool> for Satisfiability {
    fn from(answer: bool) -> Self {
        if answer {
            Satisfiability::Satisfied
        } else {
            Satisfiability::Unsatisfied
        }
    }
}

impl std::fmt::Display for Satisfiability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_unknown() {
        assert_eq!(Satisfiability::default(), Satisfiability::Unknown);
    }

    #[test]
    fn boolean_results_are_answers() {
        assert_eq!(
            Satisfiability::from_result(&json!(true)),
            Satisfiability::Satisfied
        );
        assert_eq!(
            Satisfiability::from_result(&json!(false)),
            Satisfiability::Unsatisfied
        );
    }

    #[test]
    fn non_boolean_results_are_unknown() {
        for value in [json!(null), json!("true"), json!(1), json!({"ok": true}), json!([])] {
            assert_eq!(Satisfiability::from_result(&value), Satisfiability::Unknown);
        }
    }

    #[test]
    fn indicators_are_distinct() {
        let all = [
            Satisfiability::Unknown,
            Satisfiability::Satisfied,
            Satisfiability::Unsatisfied,
        ];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.indicator_markup(), b.indicator_markup());
                    assert_ne!(a.label(), b.label());
                }
            }
        }
        assert_eq!(Satisfiability::Unknown.to_string(), "undetermined");
    }

    #[test]
    fn as_bool_round_trips_answers() {
        assert_eq!(Satisfiability::Satisfied.as_bool(), Some(true));
        assert_eq!(Satisfiability::Unsatisfied.as_bool(), Some(false));
        assert_eq!(Satisfiability::Unknown.as_bool(), None);
        assert!(!Satisfiability::Unknown.is_known());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Satisfiability::Unsatisfied).unwrap();
        assert_eq!(json, "\"unsatisfied\"");
    }
}
