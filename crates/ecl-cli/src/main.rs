//! # ecl CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ecl_cli::catalog::{run_overview, run_stages, OverviewArgs, StagesArgs};
use ecl_cli::component::{run_component, ComponentArgs};
use ecl_cli::graph::{run_graph, GraphArgs};
use ecl_cli::validate::{run_validate, ValidateArgs};

/// Component lifecycle workflow engine.
///
/// Lists lifecycle stages, validates a component's stage and next move
/// against recorded facts, and exports the transition graph.
#[derive(Parser, Debug)]
#[command(name = "ecl", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the stage catalog.
    Stages(StagesArgs),

    /// Validate a stage and optional transition against a facts file.
    Validate(ValidateArgs),

    /// Summarise automation levels and stakeholder involvement.
    Overview(OverviewArgs),

    /// Export the transition graph.
    Graph(GraphArgs),

    /// Manage component records in a local state directory.
    Component(ComponentArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Stages(args) => run_stages(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Overview(args) => run_overview(&args),
        Commands::Graph(args) => run_graph(&args),
        Commands::Component(args) => run_component(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
