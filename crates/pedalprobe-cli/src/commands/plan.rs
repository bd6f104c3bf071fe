//! Sweep plan commands.

use super::common::load_plan;
use clap::{Args, Subcommand};
use pedalprobe_config::SweepPlan;
use std::path::PathBuf;

#[derive(Args)]
pub struct PlanArgs {
    #[command(subcommand)]
    command: PlanCommand,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Write the standard 100 Hz - 10 kHz plan to a file
    Init {
        /// Destination TOML file
        path: PathBuf,

        /// Plan name
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the frequencies and scope settings of a plan
    Show {
        /// Plan TOML file
        path: PathBuf,
    },
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    match args.command {
        PlanCommand::Init { path, name, force } => init_plan(path, name, force),
        PlanCommand::Show { path } => show_plan(path),
    }
}

fn init_plan(path: PathBuf, name: Option<String>, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let plan = match name {
        Some(name) => SweepPlan::new(name),
        None => SweepPlan::default(),
    };
    plan.save(&path)?;

    println!("Wrote plan '{}' to {}", plan.name, path.display());
    Ok(())
}

fn show_plan(path: PathBuf) -> anyhow::Result<()> {
    let plan = load_plan(&path)?;

    println!("Plan: {}", plan.name);
    if let Some(desc) = &plan.description {
        println!("Description: {}", desc);
    }
    println!(
        "Amplitude: {} V, {} periods over {} divisions, {} points per capture, settle {} ms",
        plan.amplitude_vpp, plan.periods_per_capture, plan.divisions, plan.capture_points, plan.settle_ms
    );
    println!();
    println!("{:>5} {:>12} {:>14} {:>14}", "#", "freq (Hz)", "s/div", "dt (s)");
    for (i, f) in plan.frequencies().into_iter().enumerate() {
        println!(
            "{:>5} {:>12.3} {:>14.4e} {:>14.4e}",
            i,
            f,
            plan.time_per_division(f),
            plan.sample_interval(f)
        );
    }

    Ok(())
}
