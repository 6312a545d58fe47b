//! Daily aggregation: readings grouped by (series, date) with summed counts.

use crate::error::PipelineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use svt_core::reading::RawReading;
use svt_core::series::{DailyTrafficPoint, SeriesKey};

/// Group readings by (store, sensor, calendar date) and sum visitor counts
/// into one `DailyTrafficPoint` per group.
///
/// Every reading contributes to exactly one point. The BTreeMap keys give
/// the output its required ascending (series_key, date) ordering and rule
/// out duplicate (key, date) pairs by construction.
pub fn aggregate_daily(readings: &[RawReading]) -> Vec<DailyTrafficPoint> {
    let mut totals: BTreeMap<(SeriesKey, NaiveDate), u64> = BTreeMap::new();
    for reading in readings {
        let key = SeriesKey {
            store_id: reading.store_id.clone(),
            sensor_id: reading.sensor_id,
        };
        *totals.entry((key, reading.date)).or_insert(0) += reading.visitor_count as u64;
    }
    totals
        .into_iter()
        .map(|((key, date), daily_traffic)| DailyTrafficPoint {
            key,
            date,
            daily_traffic,
        })
        .collect()
}

/// Verify the uniqueness invariant on an aggregated, sorted point series:
/// at most one point per (series_key, date).
///
/// A violation means the aggregation itself is broken and the run must not
/// publish anything, so this is a fatal error rather than a reportable
/// event.
pub fn verify_series_integrity(points: &[DailyTrafficPoint]) -> Result<(), PipelineError> {
    for pair in points.windows(2) {
        if pair[0].key == pair[1].key && pair[0].date == pair[1].date {
            return Err(PipelineError::SeriesIntegrity {
                store_id: pair[0].key.store_id.clone(),
                sensor_id: pair[0].key.sensor_id,
                date: pair[0].date,
            });
        }
    }
    Ok(())
}
