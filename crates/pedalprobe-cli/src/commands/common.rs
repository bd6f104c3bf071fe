//! Shared CLI helpers used across multiple commands.

use indicatif::{ProgressBar, ProgressStyle};
use pedalprobe_config::SweepPlan;
use std::path::Path;

/// Load a sweep plan, naming the file in the error.
pub fn load_plan(path: &Path) -> anyhow::Result<SweepPlan> {
    SweepPlan::load(path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

/// Progress bar over sweep points.
pub fn point_progress(len: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} points ({msg})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Format an optional percentage for a table cell.
pub fn percent_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}
