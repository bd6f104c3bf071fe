//! Display sweep dataset metadata.

use clap::Args;
use pedalprobe_io::load_sweep;

/// Display sweep dataset information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the sweep dataset (JSON)
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let sweep = load_sweep(&args.file)?;
    let freqs = sweep.frequencies();

    println!("File:        {}", args.file.display());
    println!(
        "Description: {}",
        sweep.description().unwrap_or("(none)")
    );
    println!("Amplitude:   {} V", sweep.amplitude());
    println!("Points:      {}", sweep.len());
    if let (Some(first), Some(last)) = (freqs.first(), freqs.last()) {
        println!("Range:       {:.2} Hz - {:.2} Hz", first, last);
    }

    let lengths = sweep
        .inputs()
        .iter()
        .chain(sweep.outputs())
        .map(|w| w.len());
    if let (Some(min), Some(max)) = (lengths.clone().min(), lengths.max()) {
        if min == max {
            println!("Capture:     {} samples", min);
        } else {
            println!("Capture:     {} - {} samples", min, max);
        }
    }

    let rates = sweep.inputs().iter().map(|w| w.sample_rate());
    if let (Some(min), Some(max)) = (
        rates.clone().min_by(f64::total_cmp),
        rates.max_by(f64::total_cmp),
    ) {
        println!("Sample Rate: {} - {}", format_rate(min), format_rate(max));
    }

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_rate(hz: f64) -> String {
    if hz >= 1e6 {
        format!("{:.3} MS/s", hz / 1e6)
    } else if hz >= 1e3 {
        format!("{:.3} kS/s", hz / 1e3)
    } else {
        format!("{:.3} S/s", hz)
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
