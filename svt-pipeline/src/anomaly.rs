//! Anomaly classification against the trailing baseline.

use svt_core::series::{DailyTrafficPoint, EnrichedDailyPoint};

/// Classify one daily point against its baseline.
///
/// `pct_change` is the relative deviation from the baseline in percent; it
/// is undefined when the baseline is undefined or zero, and a day without a
/// defined `pct_change` is never anomalous.
pub fn classify(
    point: DailyTrafficPoint,
    moving_average: Option<f64>,
    threshold_pct: f64,
) -> EnrichedDailyPoint {
    let pct_change = match moving_average {
        Some(ma) if ma != 0.0 => {
            Some((point.daily_traffic as f64 - ma) / ma * 100.0)
        }
        _ => None,
    };
    let is_anomaly = pct_change.is_some_and(|pct| pct.abs() > threshold_pct);

    EnrichedDailyPoint {
        point,
        moving_average,
        pct_change,
        is_anomaly,
    }
}
