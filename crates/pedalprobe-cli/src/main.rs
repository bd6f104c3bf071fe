//! pedalprobe CLI - Frequency-sweep characterization of analog effect pedals.

mod commands;
mod device;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pedalprobe")]
#[command(author, version, about = "Frequency-sweep measurements for effect pedals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and inspect sweep plans
    Plan(commands::plan::PlanArgs),

    /// Record a sweep through a simulated device
    Simulate(commands::simulate::SimulateArgs),

    /// Build a sweep dataset from capture files
    Import(commands::import::ImportArgs),

    /// Compute linear response, THD and harmonic maps of a sweep
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show sweep dataset information
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so tables on stdout stay machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Import(args) => commands::import::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
