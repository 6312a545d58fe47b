//! Per-run bookkeeping surfaced alongside the output table.

use svt_core::reading::RejectedRecord;

/// Summary of one pipeline run: what came in, what was excluded and why,
/// and what went out. Rejections and duplicates are reported here rather
/// than aborting the run, so downstream totals stay explainable.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Valid readings received across all input batches, before dedup.
    pub readings_in: u64,
    /// Readings kept after first-seen-wins deduplication.
    pub readings_kept: u64,
    /// Duplicate readings dropped by the merger.
    pub duplicates: u64,
    /// Rows rejected during normalization, with source/line/field context.
    pub rejected: Vec<RejectedRecord>,
    /// Finalized rows emitted.
    pub rows_out: u64,
}

impl RunReport {
    /// Log a one-look summary of the run at info level, with each rejected
    /// row detailed at warn level.
    pub fn log_summary(&self) {
        log::info!(
            "pipeline run: {} readings in, {} kept ({} duplicates dropped), {} rows out, {} rows rejected",
            self.readings_in,
            self.readings_kept,
            self.duplicates,
            self.rows_out,
            self.rejected.len()
        );
        for rejected in &self.rejected {
            log::warn!(
                "rejected {}:{}: {} ({})",
                rejected.source,
                rejected.line,
                rejected.error,
                rejected.raw
            );
        }
    }
}
