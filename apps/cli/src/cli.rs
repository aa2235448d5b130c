//! Argument parsing for the `w3rt` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface for compiling, validating, and running w3rt
/// workflows.
#[derive(Parser)]
#[command(name = "w3rt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level override (defaults to `info`, or `RUST_LOG` if set).
    #[arg(long, global = true, env = "W3RT_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a DAG-form workflow document.
    Validate(ValidateArgs),

    /// Print source actions and the compiled plan, tagging injected steps.
    Explain(ExplainArgs),

    /// Compile a workflow into a content-hashed plan artifact.
    Compile(CompileArgs),

    /// Recompute a plan's hash and check it against a recorded artifact.
    Verify(VerifyArgs),

    /// Inspect append-only run traces.
    #[command(subcommand)]
    Trace(TraceCommand),

    /// Execute a staged workflow locally against a stub tool registry.
    ///
    /// This is a development/demo harness — it never talks to a real chain
    /// driver or signer.
    Run(RunArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the workflow document (YAML or JSON).
    pub workflow: PathBuf,
}

#[derive(clap::Args)]
pub struct ExplainArgs {
    pub workflow: PathBuf,
}

#[derive(clap::Args)]
pub struct CompileArgs {
    pub workflow: PathBuf,

    /// Write the compiled plan here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Attach this policy document to the plan's `meta`.
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    pub plan: PathBuf,
    pub artifact: PathBuf,
}

#[derive(Subcommand)]
pub enum TraceCommand {
    /// List run ids, newest first.
    Ls {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print matching events from one run as JSON lines.
    Show {
        run_id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long = "type")]
        types: Vec<String>,
    },
    /// Print an aggregate audit report as pretty JSON.
    Audit {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to a staged workflow document (YAML or JSON).
    pub workflow: PathBuf,

    /// Policy document layered under `W3RT_POLICY__...` environment
    /// overrides; unused by the stub run harness today but accepted for
    /// parity with `compile`.
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Base directory for the trace store.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}
