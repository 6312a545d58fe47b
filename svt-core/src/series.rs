//! Per-series aggregates and the finalized output row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifies one independent traffic time series: a single sensor within a
/// single store.
///
/// The derived ordering is (store_id, sensor_id), which is exactly the
/// ordering required of the finalized table, so sorted iteration over keys
/// yields output order for free. Series never influence one another; all
/// aggregation and baseline computation is scoped to one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub store_id: String,
    pub sensor_id: u8,
}

/// One day's aggregate traffic for a series: the sum of all visitor counts
/// recorded for that (store, sensor) on that date.
///
/// At most one point exists per (key, date) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrafficPoint {
    pub key: SeriesKey,
    pub date: NaiveDate,
    pub daily_traffic: u64,
}

/// A daily point enriched with its trailing baseline and anomaly flag.
///
/// `moving_average` is `None` for a series' earliest days (fewer than the
/// configured number of prior recorded days). `pct_change` is `None`
/// whenever the baseline is absent or zero, and `is_anomaly` is always
/// false in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDailyPoint {
    pub point: DailyTrafficPoint,
    pub moving_average: Option<f64>,
    pub pct_change: Option<f64>,
    pub is_anomaly: bool,
}

/// One row of the finalized traffic table, as handed to the persistence
/// collaborator. Serializes to/from the output CSV schema; absent optionals
/// become empty CSV fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRow {
    pub date: NaiveDate,
    pub store_id: String,
    pub sensor_id: u8,
    pub daily_traffic: u64,
    pub moving_average_4w: Option<f64>,
    pub pct_change: Option<f64>,
    pub day_of_week: String,
    pub is_anomaly: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_key_ordering_matches_output_order() {
        let mut keys = vec![
            SeriesKey { store_id: "Paris".into(), sensor_id: 0 },
            SeriesKey { store_id: "Lille".into(), sensor_id: 3 },
            SeriesKey { store_id: "Lille".into(), sensor_id: 1 },
        ];
        keys.sort();
        assert_eq!(keys[0].store_id, "Lille");
        assert_eq!(keys[0].sensor_id, 1);
        assert_eq!(keys[1].sensor_id, 3);
        assert_eq!(keys[2].store_id, "Paris");
    }

    #[test]
    fn test_traffic_row_csv_round_trip() {
        let row = TrafficRow {
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            store_id: "Lyon".into(),
            sensor_id: 5,
            daily_traffic: 1234,
            moving_average_4w: None,
            pct_change: None,
            day_of_week: "Monday".into(),
            is_anomaly: false,
        };

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(&row).unwrap();
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(data.contains("2025-02-03,Lyon,5,1234,,,Monday,false"));

        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let parsed: TrafficRow = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed, row);
    }
}
