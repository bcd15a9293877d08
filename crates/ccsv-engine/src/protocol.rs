//! Messages exchanged with the checking engine.
//!
//! One exchange per dispatch: the host writes a [`EngineRequest::Program`]
//! line followed by one check request, the engine answers with a single
//! [`EngineReply`] line. Each message is one JSON object terminated by a
//! newline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::satisfiability::Satisfiability;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineRequest {
    /// Full CCS program source; the engine compiles it before checking.
    Program { program: String },
    #[serde(rename_all = "camelCase")]
    IsStronglyBisimilar {
        left_process: String,
        right_process: String,
    },
    #[serde(rename_all = "camelCase")]
    IsWeaklyBisimilar {
        left_process: String,
        right_process: String,
    },
    #[serde(rename_all = "camelCase")]
    CheckFormula {
        process_name: String,
        formula: String,
        use_strict: bool,
    },
}

impl EngineRequest {
    /// Wire name of the request, as written in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineRequest::Program { .. } => "program",
            EngineRequest::IsStronglyBisimilar { .. } => "isStronglyBisimilar",
            EngineRequest::IsWeaklyBisimilar { .. } => "isWeaklyBisimilar",
            EngineRequest::CheckFormula { .. } => "checkFormula",
        }
    }
}

/// The engine's single answer. `result` is a boolean when the engine reached
/// a verdict; any other value (or a missing field) means undetermined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReply {
    #[serde(default)]
    pub result: Value,
}

impl EngineReply {
    pub fn verdict(&self) -> Satisfiability {
        Satisfiability::from_result(&self.result)
    }
}

/// Serialize a request as one newline-terminated JSON line.
pub fn encode_line(request: &EngineRequest) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_reply(line: &str) -> Result<EngineReply, serde_json::Error> {
    serde_json::from_str(line.trim())
}
