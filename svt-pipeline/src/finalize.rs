//! Final row assembly for the persistence collaborator.

use svt_core::dates;
use svt_core::series::{EnrichedDailyPoint, TrafficRow};

/// Assemble enriched points into finalized rows, attaching the weekday
/// name. Pure assembly: no numeric field is altered, and the iterator is
/// lazy so the collaborator can stream rows straight to a sink.
///
/// Input order is preserved; aggregation already sorted the points by
/// (store_id, sensor_id, date), which is the required table order.
pub fn finalize(points: Vec<EnrichedDailyPoint>) -> impl Iterator<Item = TrafficRow> {
    points.into_iter().map(|enriched| TrafficRow {
        date: enriched.point.date,
        day_of_week: dates::weekday_name(&enriched.point.date).to_string(),
        store_id: enriched.point.key.store_id,
        sensor_id: enriched.point.key.sensor_id,
        daily_traffic: enriched.point.daily_traffic,
        moving_average_4w: enriched.moving_average,
        pct_change: enriched.pct_change,
        is_anomaly: enriched.is_anomaly,
    })
}
