//! Circuit Lab - layout checker
//!
//! Loads a workbench layout, runs the closed-loop simulation, and grades the
//! layout's challenge if it declares one.
//!
//! # Usage
//!
//! ```bash
//! circuitlab loop.lab
//! circuitlab loop.lab --format json --verbose
//! ```
//!
//! Exit codes: 0 when the circuit is closed (and the challenge passes),
//! 1 otherwise, 2 when the layout cannot be loaded.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use circuitlab_core::{
    challenge::ChallengeOutcome, circuit::SimulationReport, dsl, error::Result, Workbench,
};

/// Check whether a workbench layout forms a closed circuit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the layout file (.lab)
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    report: SimulationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    challenge: Option<ChallengeOutcome>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let output = match run(&args) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    match args.format {
        OutputFormat::Human => print_human(&output),
        OutputFormat::Json => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(2);
            }
        },
    }

    let passed = output.report.status.is_closed()
        && output.challenge.as_ref().map_or(true, ChallengeOutcome::is_passed);
    process::exit(if passed { 0 } else { 1 });
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Output> {
    let ast = dsl::parse_file(&args.layout)?;
    let mut bench = Workbench::from_ast(&ast)?;
    tracing::info!(layout = %args.layout.display(), components = bench.graph().len(), "layout loaded");

    let report = bench.report();
    let challenge = ast.challenge().map(|challenge| bench.check(&challenge));
    Ok(Output { report, challenge })
}

fn print_human(output: &Output) {
    let report = &output.report;
    println!("status: {} ({})", report.code, report.message);
    println!(
        "components: {}  junctions: {}  nets: {}",
        report.components, report.junctions, report.nets
    );
    if let Some(outcome) = &output.challenge {
        println!("challenge: {}", outcome.message());
        if let ChallengeOutcome::MissingComponents { missing } = outcome {
            let names: Vec<_> = missing.iter().map(|item| item.as_str()).collect();
            println!("missing: {}", names.join(", "));
        }
    }
}
