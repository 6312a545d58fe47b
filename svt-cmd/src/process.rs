//! Process command: raw monthly CSV files in, finalized traffic table out.

use anyhow::Context;
use log::info;
use std::path::{Path, PathBuf};
use svt_pipeline::PipelineConfig;

/// Find raw visitor files (`visiteurs_*.csv`) in a directory, sorted by
/// name so runs are deterministic regardless of directory order.
fn find_raw_files(raw_dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let dir = Path::new(raw_dir);
    if !dir.is_dir() {
        anyhow::bail!("raw data directory not found: {}", raw_dir);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if name.starts_with("visiteurs_") && name.ends_with(".csv") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!("no visiteurs_*.csv files found in {}", raw_dir);
    }
    Ok(files)
}

/// Run the pipeline over a directory of raw monthly CSVs and write the
/// finalized table.
///
/// The table is staged to a temporary file and renamed into place only
/// after the whole run succeeded, so a failed run never publishes a
/// partial table.
pub fn run_process(
    raw_dir: &str,
    output_csv: &str,
    window: usize,
    threshold: f64,
) -> anyhow::Result<()> {
    let files = find_raw_files(raw_dir)?;
    info!("processing {} raw files from {}", files.len(), raw_dir);

    let mut batches = Vec::with_capacity(files.len());
    for path in &files {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let outcome = svt_core::reading::parse_readings(&source, &data)
            .with_context(|| format!("failed to parse {}", source))?;
        info!(
            "{}: {} readings, {} rejected",
            source,
            outcome.readings.len(),
            outcome.rejected.len()
        );
        batches.push(outcome);
    }

    let config = PipelineConfig {
        baseline_window: window,
        anomaly_threshold_pct: threshold,
    };
    let run = svt_pipeline::run(batches, &config)?;
    run.report.log_summary();

    let staged = format!("{output_csv}.tmp");
    {
        let mut wtr = csv::Writer::from_path(&staged)
            .with_context(|| format!("failed to create {}", staged))?;
        for row in &run.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }
    std::fs::rename(&staged, output_csv)
        .with_context(|| format!("failed to publish {}", output_csv))?;

    info!("wrote {} rows to {}", run.rows.len(), output_csv);
    Ok(())
}
