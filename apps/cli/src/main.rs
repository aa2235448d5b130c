//! `w3rt` — compile, validate, verify, and locally run w3rt workflows.

mod cli;
mod commands;
mod config;
mod doc;
mod logging;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let result = match &cli.command {
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Explain(args) => commands::explain::run(args),
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Verify(args) => commands::verify::run(args),
        Commands::Trace(cmd) => commands::trace::run(cmd),
        Commands::Run(args) => commands::run::run(args).await,
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
