//! Pipeline configuration.

/// Number of prior recorded days averaged into the baseline by default.
pub const DEFAULT_BASELINE_WINDOW: usize = 4;

/// Default anomaly threshold: a day is anomalous when its traffic deviates
/// from the baseline by more than this percentage in either direction.
pub const DEFAULT_ANOMALY_THRESHOLD_PCT: f64 = 50.0;

/// Configuration for one pipeline run, fixed before the run starts.
///
/// Passed explicitly into [`crate::run`] so the whole computation stays a
/// pure function of (input records, configuration).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// How many prior recorded days feed each day's moving average. Days
    /// with fewer prior points get no baseline at all.
    pub baseline_window: usize,
    /// Relative deviation (in percent, absolute value) above which a day is
    /// flagged anomalous.
    pub anomaly_threshold_pct: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            baseline_window: DEFAULT_BASELINE_WINDOW,
            anomaly_threshold_pct: DEFAULT_ANOMALY_THRESHOLD_PCT,
        }
    }
}
