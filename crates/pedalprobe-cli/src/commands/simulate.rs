//! Record a sweep through a simulated device.

use super::common::{load_plan, point_progress};
use crate::device::{Curve, Device};
use clap::Args;
use pedalprobe_analysis::{SweepAnalyzer, Waveform};
use pedalprobe_config::SweepPlan;
use pedalprobe_io::{save_sweep, write_capture_csv};
use std::path::PathBuf;

#[derive(Args)]
pub struct SimulateArgs {
    /// Sweep plan TOML file (standard plan if omitted)
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Device transfer curve
    #[arg(short, long, value_enum, default_value = "soft-clip")]
    device: Curve,

    /// Small-signal gain (V/V)
    #[arg(short, long, default_value = "10.0")]
    gain: f64,

    /// Clipping level in volts
    #[arg(short, long, default_value = "0.5")]
    clip: f64,

    /// First-order low-pass corner in Hz
    #[arg(long)]
    cutoff: Option<f64>,

    /// Also write every capture as NNN_in.csv / NNN_out.csv into this directory
    #[arg(long)]
    captures: Option<PathBuf>,

    /// Output sweep dataset (JSON)
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let plan = match &args.plan {
        Some(path) => load_plan(path)?,
        None => SweepPlan::default(),
    };
    if !(args.gain.is_finite() && args.clip.is_finite() && args.clip > 0.0) {
        anyhow::bail!("gain must be finite and clip must be positive");
    }
    if let Some(fc) = args.cutoff
        && !(fc.is_finite() && fc > 0.0)
    {
        anyhow::bail!("cutoff must be a positive frequency, got {fc}");
    }

    let device = Device {
        curve: args.device,
        gain: args.gain,
        clip: args.clip,
        cutoff: args.cutoff,
    };
    let peak = plan.amplitude_vpp / 2.0;
    let frequencies = plan.frequencies();

    if let Some(dir) = &args.captures {
        std::fs::create_dir_all(dir)?;
    }

    println!(
        "Simulating {:?} (gain {}, clip {} V) over {} points...",
        device.curve,
        device.gain,
        device.clip,
        frequencies.len()
    );

    let pb = point_progress(frequencies.len())?;
    let mut inputs = Vec::with_capacity(frequencies.len());
    let mut outputs = Vec::with_capacity(frequencies.len());
    for (i, &f) in frequencies.iter().enumerate() {
        pb.set_message(format!("{f:.1} Hz"));

        let dt = plan.sample_interval(f);
        let time: Vec<f64> = (0..plan.capture_points).map(|k| k as f64 * dt).collect();
        let (x, y) = device.drive(f, peak, &time);
        let input = Waveform::new(time.clone(), x)?;
        let output = Waveform::new(time, y)?;

        if let Some(dir) = &args.captures {
            write_capture_csv(dir.join(format!("{i:03}_in.csv")), &input)?;
            write_capture_csv(dir.join(format!("{i:03}_out.csv")), &output)?;
        }

        tracing::debug!(index = i, frequency = f, dt, "simulated point");
        inputs.push(input);
        outputs.push(output);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let description = plan
        .description
        .clone()
        .unwrap_or_else(|| format!("simulated {:?} via {}", device.curve, plan.name));
    let sweep = SweepAnalyzer::new(inputs, outputs, frequencies, plan.amplitude_vpp)?
        .with_description(description);
    save_sweep(&args.output, &sweep)?;

    println!("Saved {} points to {}", sweep.len(), args.output.display());
    Ok(())
}
