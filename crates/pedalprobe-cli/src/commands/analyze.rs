//! Sweep analysis command.

use super::common::percent_cell;
use clap::Args;
use pedalprobe_analysis::export::{export_frd, export_harmonic_map_csv, export_thd_csv};
use pedalprobe_analysis::{HarmonicDistortion, HarmonicMap, LinearResponse};
use pedalprobe_io::load_sweep;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Sweep dataset (JSON)
    #[arg(value_name = "SWEEP")]
    input: PathBuf,

    /// Write the linear response as FRD (REW compatible)
    #[arg(long)]
    frd: Option<PathBuf>,

    /// Write THD per point as CSV
    #[arg(long)]
    thd_csv: Option<PathBuf>,

    /// Write the normalized harmonic map as CSV
    #[arg(long)]
    map_csv: Option<PathBuf>,

    /// Write a JSON summary
    #[arg(long)]
    json: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let sweep = load_sweep(&args.input)?;

    println!("Analyzing {}...", args.input.display());
    if let Some(desc) = sweep.description() {
        println!("  {}", desc);
    }
    println!(
        "  {} points, stimulus {} V",
        sweep.len(),
        sweep.amplitude()
    );
    println!();

    // Points with a missing fundamental are reported and left out of the
    // exports; the rest of the sweep is still analyzed.
    let mut linear = Vec::with_capacity(sweep.len());
    let mut thd = Vec::with_capacity(sweep.len());
    println!(
        "{:>12} {:>10} {:>10} {:>12} {:>12}",
        "freq (Hz)", "gain (dB)", "phase (°)", "THD in (%)", "THD out (%)"
    );
    for (i, &f) in sweep.frequencies().iter().enumerate() {
        match (sweep.linear_response_at(i), sweep.thd_at(i)) {
            (Ok(point), Ok(distortion)) => {
                println!(
                    "{:>12.2} {:>10.3} {:>10.2} {:>12} {:>12}",
                    f,
                    point.magnitude_db,
                    point.phase_deg,
                    percent_cell(distortion.thd_in),
                    percent_cell(distortion.thd_out)
                );
                linear.push(point);
                thd.push(distortion);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(index = i, frequency = f, error = %e, "skipping sweep point");
                println!("{:>12.2} {:>10} {:>10} {:>12} {:>12}", f, "-", "-", "-", "-");
            }
        }
    }

    let response: LinearResponse = linear.into_iter().collect();
    let distortion: HarmonicDistortion = thd.into_iter().collect();
    let skipped = sweep.len() - response.len();

    println!();
    if let Some(&reference) = response.magnitude_db.first() {
        match response.cutoff_frequency(reference) {
            Some(fc) => println!("  -3 dB point: {:.1} Hz (re {:.2} dB)", fc, reference),
            None => println!("  -3 dB point: not reached"),
        }
    }
    let worst = distortion
        .frequencies
        .iter()
        .zip(&distortion.thd_out)
        .filter_map(|(&f, thd)| thd.map(|t| (f, t)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((f, t)) = worst {
        println!("  Max THD out: {:.4}% at {:.1} Hz", t, f);
    }
    if distortion.unresolved() > 0 {
        println!(
            "  {} point(s) too close to the analysis bandwidth for THD",
            distortion.unresolved()
        );
    }
    if skipped > 0 {
        println!("  {} point(s) skipped (no fundamental)", skipped);
    }

    if let Some(path) = &args.frd {
        export_frd(&response, path)?;
        println!("Linear response saved to {}", path.display());
    }
    if let Some(path) = &args.thd_csv {
        export_thd_csv(&distortion, path)?;
        println!("THD saved to {}", path.display());
    }
    if let Some(path) = &args.map_csv {
        let map: HarmonicMap = sweep
            .frequencies()
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| match sweep.harmonics_at(i) {
                Ok(row) => Some((f, row)),
                Err(e) => {
                    tracing::warn!(
                        index = i,
                        frequency = f,
                        error = %e,
                        "leaving point out of harmonic map"
                    );
                    None
                }
            })
            .collect();
        export_harmonic_map_csv(&map, path)?;
        println!(
            "Harmonic map ({} rows, {} orders) saved to {}",
            map.table.len(),
            map.orders.len(),
            path.display()
        );
    }
    if let Some(path) = &args.json {
        let json = serde_json::json!({
            "description": sweep.description(),
            "amplitude": sweep.amplitude(),
            "points": sweep.len(),
            "skipped": skipped,
            "frequencies": response.frequencies,
            "magnitude_db": response.magnitude_db,
            "phase_deg": response.unwrapped_phase_deg(),
            "thd_in_percent": distortion.thd_in,
            "thd_out_percent": distortion.thd_out,
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)?)?;
        println!("Summary saved to {}", path.display());
    }

    Ok(())
}
