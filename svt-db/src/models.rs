//! Query result model structs.
//!
//! All structs derive `Serialize` so command-line consumers can print them
//! as JSON directly.

use serde::Serialize;

/// One finalized traffic row as returned by the query surface.
///
/// Mirrors the output table schema: `moving_average_4w` is absent for a
/// series' earliest days, `pct_change` additionally whenever the baseline
/// is zero.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrafficRecord {
    pub date: String,
    pub store_id: String,
    pub sensor_id: i64,
    pub daily_traffic: i64,
    pub moving_average_4w: Option<f64>,
    pub pct_change: Option<f64>,
    pub day_of_week: String,
    pub is_anomaly: bool,
}

/// Descriptive statistics for one (store, sensor) series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensorMetrics {
    pub store_id: String,
    pub sensor_id: i64,
    /// Number of daily rows recorded for this sensor.
    pub data_points: i64,
    /// Earliest recorded date (YYYY-MM-DD).
    pub first_date: String,
    /// Latest recorded date (YYYY-MM-DD).
    pub last_date: String,
    pub mean_traffic: f64,
    pub min_traffic: i64,
    pub max_traffic: i64,
    /// Days flagged anomalous.
    pub anomaly_count: i64,
    /// Share of anomalous days, in percent of data_points.
    pub anomaly_pct: f64,
}
