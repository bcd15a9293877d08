//! The out-of-process checking engine.
//!
//! Every check spawns a fresh engine process, performs one request/reply
//! exchange over its stdin/stdout, and kills it. Processes are spawned with
//! `kill_on_drop`, so dropping an in-flight check (abort, timeout) kills the
//! engine as well.

use std::fmt;
use std::process::Stdio;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::config::EngineConfig;
use crate::protocol::{decode_reply, encode_line, EngineReply, EngineRequest};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to capture engine {0}")]
    Pipe(&'static str),
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("engine closed its output without replying")]
    NoReply,
    #[error("engine did not reply within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Where the program under verification comes from.
///
/// Read once per dispatch, when `verify` is called.
pub trait ProgramSource: Send + Sync {
    fn current_program_text(&self) -> String;
}

/// A fixed program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramText(String);

impl ProgramText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl ProgramSource for ProgramText {
    fn current_program_text(&self) -> String {
        self.0.clone()
    }
}

/// Engine configuration paired with the program source it checks.
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    program: Arc<dyn ProgramSource>,
}

impl Engine {
    pub fn new(config: EngineConfig, program: impl ProgramSource + 'static) -> Self {
        Self {
            config,
            program: Arc::new(program),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn program_text(&self) -> String {
        self.program.current_program_text()
    }

    /// Run one exchange with a fresh engine process, bounded by the
    /// configured timeout.
    pub async fn check(
        &self,
        program: String,
        request: EngineRequest,
    ) -> Result<EngineReply, EngineError> {
        let exchange = exchange(&self.config, program, request);
        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| EngineError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })?,
            None => exchange.await,
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn exchange(
    config: &EngineConfig,
    program: String,
    request: EngineRequest,
) -> Result<EngineReply, EngineError> {
    let mut process = EngineProcess::spawn(config)?;
    let outcome: Result<EngineReply, EngineError> = async {
        process.send(&EngineRequest::Program { program }).await?;
        process.send(&request).await?;
        process.receive().await
    }
    .await;
    process.terminate().await;
    outcome
}

/// A running engine process with piped stdin/stdout.
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl EngineProcess {
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: config.command.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(EngineError::Pipe("stdout"))?;
        debug!(engine = %config.command, pid = ?child.id(), "engine started");

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn send(&mut self, request: &EngineRequest) -> Result<(), EngineError> {
        let line = encode_line(request)?;
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read the single reply line.
    pub async fn receive(&mut self) -> Result<EngineReply, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line).await? == 0 {
            return Err(EngineError::NoReply);
        }
        Ok(decode_reply(&line)?)
    }

    /// Kill the process and reap it. No further messages are expected.
    pub async fn terminate(mut self) {
        let pid = self.child.id();
        if let Err(err) = self.child.kill().await {
            debug!(?pid, "engine already gone: {err}");
        }
    }
}

impl fmt::Debug for EngineProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineProcess")
            .field("pid", &self.child.id())
            .finish_non_exhaustive()
    }
}
