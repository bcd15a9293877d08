//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ccsv")]
#[command(about = "Check CCS processes for bisimilarity or HML properties")]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check whether two processes are strongly bisimilar (P ~ Q)
    Strong {
        /// First process name
        first: String,

        /// Second process name
        second: String,

        #[command(flatten)]
        check: CheckArgs,
    },
    /// Check whether two processes are weakly bisimilar (P ~~ Q)
    Weak {
        /// First process name
        first: String,

        /// Second process name
        second: String,

        #[command(flatten)]
        check: CheckArgs,
    },
    /// Check whether a process satisfies an HML formula (P |= F)
    Hml {
        /// Process name
        process: String,

        /// Formula text, passed to the engine as written
        formula: String,

        /// Use the engine's strict formula semantics
        #[arg(long, default_value_t = false)]
        strict: bool,

        #[command(flatten)]
        check: CheckArgs,
    },
}

/// Options shared by every check.
#[derive(Args, Debug, Clone)]
pub(crate) struct CheckArgs {
    /// Path to the CCS program
    #[arg(long, short = 'p')]
    pub(crate) program: PathBuf,

    /// Engine executable (overrides CCSV_ENGINE)
    #[arg(long)]
    pub(crate) engine: Option<String>,

    /// Argument passed to the engine; repeat for several (overrides CCSV_ENGINE_ARGS)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub(crate) engine_args: Vec<String>,

    /// Timeout in seconds, 0 for none (overrides CCSV_ENGINE_TIMEOUT_SECS)
    #[arg(long)]
    pub(crate) timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn engine_args_accept_leading_hyphens() {
        let cli = Cli::try_parse_from([
            "ccsv",
            "strong",
            "P",
            "Q",
            "--program",
            "spec.ccs",
            "--engine",
            "sh",
            "--engine-arg",
            "-c",
            "--engine-arg",
            "cat",
        ])
        .unwrap();
        let Commands::Strong { check, .. } = cli.command else {
            panic!("expected strong subcommand");
        };
        assert_eq!(check.engine.as_deref(), Some("sh"));
        assert_eq!(check.engine_args, vec!["-c", "cat"]);
        assert_eq!(check.format, OutputFormat::Text);
    }

    #[test]
    fn hml_parses_strict_flag_and_json_format() {
        let cli = Cli::try_parse_from([
            "ccsv",
            "hml",
            "P",
            "[a]tt",
            "-p",
            "spec.ccs",
            "--strict",
            "--format",
            "json",
            "--timeout",
            "5",
        ])
        .unwrap();
        let Commands::Hml {
            process,
            formula,
            strict,
            check,
        } = cli.command
        else {
            panic!("expected hml subcommand");
        };
        assert_eq!(process, "P");
        assert_eq!(formula, "[a]tt");
        assert!(strict);
        assert_eq!(check.timeout, Some(5));
        assert_eq!(check.format, OutputFormat::Json);
    }

    #[test]
    fn program_is_required() {
        assert!(Cli::try_parse_from(["ccsv", "weak", "P", "Q"]).is_err());
    }
}
