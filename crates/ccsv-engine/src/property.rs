//! Verification tasks: one question about a CCS program, answered by the
//! external engine.
//!
//! A [`Property`] owns at most one outstanding dispatch. `verify` refuses to
//! start a second one; `abort` releases the dispatch and kills its engine
//! process. Editing any input resets the answer to
//! [`Satisfiability::Unknown`] on the spot, and a dispatch started before the
//! edit can no longer set a verdict.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ccsv_hml::markup::escape;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::protocol::EngineRequest;
use crate::satisfiability::Satisfiability;

static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PropertyId(u64);

impl PropertyId {
    fn fresh() -> Self {
        PropertyId(NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("property {property} is already being verified; abort it or wait for completion")]
    AlreadyRunning { property: PropertyId },
    #[error("verification requires a running tokio runtime")]
    NoRuntime,
    #[error("property {property} is a {kind} check and has no {field}")]
    NotApplicable {
        property: PropertyId,
        kind: &'static str,
        field: &'static str,
    },
}

/// What a property asks of the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
    StrongBisimulation {
        first_process: String,
        second_process: String,
    },
    WeakBisimulation {
        first_process: String,
        second_process: String,
    },
    Hml {
        process: String,
        formula: String,
        #[serde(default)]
        use_strict_semantics: bool,
    },
}

impl Question {
    pub fn kind(&self) -> &'static str {
        match self {
            Question::StrongBisimulation { .. } => "strong bisimulation",
            Question::WeakBisimulation { .. } => "weak bisimulation",
            Question::Hml { .. } => "HML",
        }
    }

    /// Markup-safe statement of the question, e.g. `P ~ Q` or `P |= φ`.
    pub fn describe(&self) -> String {
        match self {
            Question::StrongBisimulation {
                first_process,
                second_process,
            } => format!("{} ~ {}", escape(first_process), escape(second_process)),
            Question::WeakBisimulation {
                first_process,
                second_process,
            } => format!("{} ~~ {}", escape(first_process), escape(second_process)),
            Question::Hml {
                process, formula, ..
            } => format!("{} |= {}", escape(process), escape(formula)),
        }
    }

    /// The check request sent after the program.
    pub fn request(&self) -> EngineRequest {
        match self {
            Question::StrongBisimulation {
                first_process,
                second_process,
            } => EngineRequest::IsStronglyBisimilar {
                left_process: first_process.clone(),
                right_process: second_process.clone(),
            },
            Question::WeakBisimulation {
                first_process,
                second_process,
            } => EngineRequest::IsWeaklyBisimilar {
                left_process: first_process.clone(),
                right_process: second_process.clone(),
            },
            Question::Hml {
                process,
                formula,
                use_strict_semantics,
            } => EngineRequest::CheckFormula {
                process_name: process.clone(),
                formula: formula.clone(),
                use_strict: *use_strict_semantics,
            },
        }
    }
}

/// Plain statement of the question, without escaping.
impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::StrongBisimulation {
                first_process,
                second_process,
            } => write!(f, "{first_process} ~ {second_process}"),
            Question::WeakBisimulation {
                first_process,
                second_process,
            } => write!(f, "{first_process} ~~ {second_process}"),
            Question::Hml {
                process, formula, ..
            } => write!(f, "{process} |= {formula}"),
        }
    }
}

struct TaskState {
    satisfiable: Satisfiability,
    /// Bumped by every input edit.
    revision: u64,
    next_generation: u64,
    dispatch: Option<Dispatch>,
}

/// Ownership of the outstanding engine dispatch.
struct Dispatch {
    generation: u64,
    cancel: oneshot::Sender<()>,
}

fn lock(state: &Mutex<TaskState>) -> MutexGuard<'_, TaskState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A verification task.
pub struct Property {
    id: PropertyId,
    question: Question,
    state: Arc<Mutex<TaskState>>,
}

impl Property {
    pub fn new(question: Question) -> Self {
        Self {
            id: PropertyId::fresh(),
            question,
            state: Arc::new(Mutex::new(TaskState {
                satisfiable: Satisfiability::Unknown,
                revision: 0,
                next_generation: 0,
                dispatch: None,
            })),
        }
    }

    pub fn strong_bisimulation(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::new(Question::StrongBisimulation {
            first_process: first.into(),
            second_process: second.into(),
        })
    }

    pub fn weak_bisimulation(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::new(Question::WeakBisimulation {
            first_process: first.into(),
            second_process: second.into(),
        })
    }

    pub fn hml(process: impl Into<String>, formula: impl Into<String>) -> Self {
        Self::new(Question::Hml {
            process: process.into(),
            formula: formula.into(),
            use_strict_semantics: false,
        })
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn describe(&self) -> String {
        self.question.describe()
    }

    pub fn satisfiable(&self) -> Satisfiability {
        lock(&self.state).satisfiable
    }

    pub fn status_markup(&self) -> &'static str {
        self.satisfiable().indicator_markup()
    }

    /// Whether a dispatch is outstanding.
    pub fn is_verifying(&self) -> bool {
        lock(&self.state).dispatch.is_some()
    }

    // ---------------------------------------------------------------
    // Inputs
    // ---------------------------------------------------------------

    pub fn set_question(&mut self, question: Question) {
        self.question = question;
        self.invalidate();
    }

    pub fn first_process(&self) -> Option<&str> {
        match &self.question {
            Question::StrongBisimulation { first_process, .. }
            | Question::WeakBisimulation { first_process, .. } => Some(first_process),
            Question::Hml { .. } => None,
        }
    }

    pub fn second_process(&self) -> Option<&str> {
        match &self.question {
            Question::StrongBisimulation { second_process, .. }
            | Question::WeakBisimulation { second_process, .. } => Some(second_process),
            Question::Hml { .. } => None,
        }
    }

    pub fn process(&self) -> Option<&str> {
        match &self.question {
            Question::Hml { process, .. } => Some(process),
            _ => None,
        }
    }

    pub fn formula(&self) -> Option<&str> {
        match &self.question {
            Question::Hml { formula, .. } => Some(formula),
            _ => None,
        }
    }

    pub fn use_strict_semantics(&self) -> Option<bool> {
        match &self.question {
            Question::Hml {
                use_strict_semantics,
                ..
            } => Some(*use_strict_semantics),
            _ => None,
        }
    }

    pub fn set_first_process(&mut self, name: impl Into<String>) -> Result<(), PropertyError> {
        let missing = self.not_applicable("first process");
        match &mut self.question {
            Question::StrongBisimulation { first_process, .. }
            | Question::WeakBisimulation { first_process, .. } => *first_process = name.into(),
            Question::Hml { .. } => return Err(missing),
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_second_process(&mut self, name: impl Into<String>) -> Result<(), PropertyError> {
        let missing = self.not_applicable("second process");
        match &mut self.question {
            Question::StrongBisimulation { second_process, .. }
            | Question::WeakBisimulation { second_process, .. } => *second_process = name.into(),
            Question::Hml { .. } => return Err(missing),
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_process(&mut self, name: impl Into<String>) -> Result<(), PropertyError> {
        let missing = self.not_applicable("process");
        match &mut self.question {
            Question::Hml { process, .. } => *process = name.into(),
            _ => return Err(missing),
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_formula(&mut self, text: impl Into<String>) -> Result<(), PropertyError> {
        let missing = self.not_applicable("formula");
        match &mut self.question {
            Question::Hml { formula, .. } => *formula = text.into(),
            _ => return Err(missing),
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_use_strict_semantics(&mut self, strict: bool) -> Result<(), PropertyError> {
        let missing = self.not_applicable("semantics switch");
        match &mut self.question {
            Question::Hml {
                use_strict_semantics,
                ..
            } => *use_strict_semantics = strict,
            _ => return Err(missing),
        }
        self.invalidate();
        Ok(())
    }

    fn not_applicable(&self, field: &'static str) -> PropertyError {
        PropertyError::NotApplicable {
            property: self.id,
            kind: self.question.kind(),
            field,
        }
    }

    fn invalidate(&self) {
        let mut state = lock(&self.state);
        state.satisfiable = Satisfiability::Unknown;
        state.revision += 1;
    }

    // ---------------------------------------------------------------
    // Verification
    // ---------------------------------------------------------------

    /// Start checking the current question on a fresh engine process.
    ///
    /// Returns immediately. When the engine answers (or fails), the answer is
    /// stored and `on_complete` runs once on the runtime. An aborted dispatch
    /// never calls it. Fails with [`PropertyError::AlreadyRunning`] while a
    /// previous dispatch is outstanding.
    pub fn verify<F>(&self, engine: &Engine, on_complete: F) -> Result<(), PropertyError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| PropertyError::NoRuntime)?;

        let (generation, revision, cancelled) = {
            let mut state = lock(&self.state);
            if state.dispatch.is_some() {
                return Err(PropertyError::AlreadyRunning { property: self.id });
            }
            let generation = state.next_generation;
            state.next_generation += 1;
            let (cancel, cancelled) = oneshot::channel();
            state.dispatch = Some(Dispatch { generation, cancel });
            (generation, state.revision, cancelled)
        };

        let property = self.id;
        let request = self.question.request();
        let program = engine.program_text();
        let engine = engine.clone();
        let state = Arc::clone(&self.state);
        debug!(%property, generation, request = request.kind(), "dispatching to engine");

        runtime.spawn(async move {
            let verdict = tokio::select! {
                _ = cancelled => {
                    debug!(%property, generation, "dispatch aborted");
                    return;
                }
                outcome = engine.check(program, request) => match outcome {
                    Ok(reply) => {
                        let verdict = reply.verdict();
                        if !verdict.is_known() {
                            warn!(%property, result = %reply.result, "engine reply has no boolean result");
                        }
                        verdict
                    }
                    Err(err) => {
                        warn!(%property, engine = %engine.config().command, "engine failed: {err}");
                        Satisfiability::Unknown
                    }
                },
            };

            match settle(&state, generation, revision, verdict) {
                Some(answer) => {
                    info!(%property, answer = %answer, "verification finished");
                    on_complete();
                }
                None => debug!(%property, generation, "dispatch released before completion"),
            }
        });
        Ok(())
    }

    /// Kill the outstanding dispatch, if any. The answer is left as it was
    /// and the completion callback is not called.
    pub fn abort(&self) {
        let dispatch = lock(&self.state).dispatch.take();
        if let Some(dispatch) = dispatch {
            debug!(property = %self.id, generation = dispatch.generation, "aborting verification");
            let _ = dispatch.cancel.send(());
        }
    }
}

/// Record the verdict of dispatch `generation` if it still owns the task.
///
/// Returns the stored answer, or `None` if the dispatch was released. A
/// verdict for inputs that changed since `revision` is stored as unknown.
fn settle(
    state: &Mutex<TaskState>,
    generation: u64,
    revision: u64,
    verdict: Satisfiability,
) -> Option<Satisfiability> {
    let mut state = lock(state);
    match &state.dispatch {
        Some(dispatch) if dispatch.generation == generation => {}
        _ => return None,
    }
    state.dispatch = None;
    state.satisfiable = if state.revision == revision {
        verdict
    } else {
        Satisfiability::Unknown
    };
    Some(state.satisfiable)
}

impl Drop for Property {
    fn drop(&mut self) {
        self.abort();
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("question", &self.question)
            .field("satisfiable", &state.satisfiable)
            .field("verifying", &state.dispatch.is_some())
            .finish()
    }
}
