//! blockade CLI entry point.
//!
//! Embeds each partition of a hazard graph as a unit-disk point set and
//! colors it with the recursive oracle-driven engine.

use anyhow::Result;
use blockade_cli::config::{self, Overrides};
use blockade_cli::input::load_partitions;
use blockade_cli::report::{summary_line, write_report, RunReport};
use blockade_core::BlockadeError;
use blockade_oracle::OracleStrategy;
use blockade_pipeline::PipelineOrchestrator;
use clap::Parser;

/// blockade version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "blockade")]
#[command(version = VERSION)]
#[command(about = "Unit-disk embedding and oracle-driven recursive coloring", long_about = None)]
struct Args {
    /// Input graph: DIMACS `.col` or partitioned hazard-graph `.json`
    #[arg(short, long)]
    input: String,

    /// Report output path (stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// TOML configuration file
    ///
    /// Example: --config configs/blockade.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Blockade radius R, shared by adjacency and embedding
    #[arg(long)]
    radius: Option<f64>,

    /// Oracle strategy: exact or heuristic
    #[arg(long)]
    oracle: Option<OracleStrategy>,

    /// Candidate sets per oracle call (K)
    #[arg(long)]
    candidates: Option<usize>,

    /// Seed for both the embedder and the oracle
    #[arg(long)]
    seed: Option<u64>,

    /// Per-call oracle budget in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Evaluate branches of each recursion level in parallel
    #[arg(long)]
    parallel: bool,

    /// Append JSONL telemetry to this path
    #[arg(long)]
    telemetry: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("blockade {} - Starting", VERSION);

    if let Err(e) = run(&args) {
        if let Some(blockade_error) = e.downcast_ref::<BlockadeError>() {
            log::error!("{}", blockade_error.user_message());
        }
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let overrides = Overrides {
        radius: args.radius,
        oracle: args.oracle,
        candidates: args.candidates,
        seed: args.seed,
        timeout_ms: args.timeout_ms,
        parallel: args.parallel,
        telemetry_path: args.telemetry.clone(),
    };
    let config = config::resolve(args.config.as_deref(), &overrides)?;

    let partitions = load_partitions(&args.input)?;
    let mut orchestrator = PipelineOrchestrator::new(config)?;
    let reports = orchestrator.run_all(&partitions)?;

    for report in &reports {
        // Keep stdout clean for the report when no output file is given.
        if args.output.is_some() {
            println!("{}", summary_line(report));
        } else {
            eprintln!("{}", summary_line(report));
        }
    }

    write_report(
        &RunReport {
            version: VERSION,
            partitions: &reports,
        },
        args.output.as_deref(),
    )
}
