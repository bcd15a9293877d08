//! `strong`, `weak` and `hml`: run one property against the engine and
//! report its verdict.

use std::path::Path;

use miette::{IntoDiagnostic, WrapErr};
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use ccsv_engine::{Engine, EngineConfig, ProgramText, Property};

use crate::cli::{CheckArgs, OutputFormat};

pub(crate) async fn run_check_command(property: Property, check: CheckArgs) -> miette::Result<()> {
    let program = read_program(&check.program)?;
    let config = apply_overrides(EngineConfig::from_env(), &check);
    debug!(engine = %config.command, timeout_secs = config.timeout_secs, "engine configured");
    let engine = Engine::new(config, ProgramText::new(program));

    let (done_tx, done_rx) = oneshot::channel();
    property
        .verify(&engine, move || {
            let _ = done_tx.send(());
        })
        .into_diagnostic()?;

    tokio::select! {
        finished = done_rx => {
            finished
                .into_diagnostic()
                .wrap_err("verification ended without reporting a verdict")?;
        }
        _ = tokio::signal::ctrl_c() => {
            property.abort();
            warn!(property = %property.id(), "interrupted, engine stopped");
            return Err(miette::miette!("verification of `{}` aborted", property.question()));
        }
    }

    print_outcome(&property, check.format)
}

/// Command-line flags win over the environment. A new `--engine` drops
/// arguments meant for the previous one unless `--engine-arg` is given too.
pub(crate) fn apply_overrides(mut config: EngineConfig, check: &CheckArgs) -> EngineConfig {
    if let Some(command) = &check.engine {
        config.command = command.clone();
        config.args.clear();
    }
    if !check.engine_args.is_empty() {
        config.args = check.engine_args.clone();
    }
    if let Some(timeout_secs) = check.timeout {
        config.timeout_secs = timeout_secs;
    }
    config
}

fn read_program(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read program {}", path.display()))
}

fn print_outcome(property: &Property, format: OutputFormat) -> miette::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}: {}", property.question(), property.satisfiable());
        }
        OutputFormat::Json => {
            let report = json!({
                "id": property.id(),
                "question": property.question(),
                "description": property.describe(),
                "satisfiable": property.satisfiable(),
                "status": property.status_markup(),
            });
            let rendered = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{rendered}");
        }
    }
    Ok(())
}
