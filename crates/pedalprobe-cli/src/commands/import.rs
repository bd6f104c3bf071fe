//! Build a sweep dataset from capture files.

use super::common::{load_plan, point_progress};
use clap::Args;
use pedalprobe_analysis::{SweepAnalyzer, Waveform};
use pedalprobe_io::{CaptureFormat, read_capture, save_sweep};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ImportArgs {
    /// Directory holding NNN_in.{csv,wav} and NNN_out.{csv,wav} captures
    dir: PathBuf,

    /// Sweep plan the captures were taken with
    #[arg(short, long)]
    plan: PathBuf,

    /// Output sweep dataset (JSON)
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: ImportArgs) -> anyhow::Result<()> {
    let plan = load_plan(&args.plan)?;
    let frequencies = plan.frequencies();

    println!(
        "Importing {} points from {}...",
        frequencies.len(),
        args.dir.display()
    );

    let pb = point_progress(frequencies.len())?;
    let mut inputs = Vec::with_capacity(frequencies.len());
    let mut outputs = Vec::with_capacity(frequencies.len());
    for (i, &f) in frequencies.iter().enumerate() {
        pb.set_message(format!("{f:.1} Hz"));
        inputs.push(read_point(&args.dir, i, "in")?);
        outputs.push(read_point(&args.dir, i, "out")?);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let sweep = SweepAnalyzer::new(inputs, outputs, frequencies, plan.amplitude_vpp)?
        .with_description(plan.description.unwrap_or(plan.name));
    save_sweep(&args.output, &sweep)?;

    println!("Saved {} points to {}", sweep.len(), args.output.display());
    Ok(())
}

fn read_point(dir: &Path, index: usize, side: &str) -> anyhow::Result<Waveform> {
    for format in [CaptureFormat::Csv, CaptureFormat::Wav] {
        let path = dir.join(format!("{index:03}_{side}.{}", format.extension()));
        if path.exists() {
            return read_capture(&path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e));
        }
    }
    anyhow::bail!(
        "missing capture {index:03}_{side}.csv or {index:03}_{side}.wav in {}",
        dir.display()
    )
}
