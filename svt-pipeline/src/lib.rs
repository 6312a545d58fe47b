//! The visitor traffic aggregation-and-anomaly pipeline.
//!
//! One deterministic batch pass over normalized reading batches:
//!
//! merge → daily aggregation → integrity check → trailing baseline →
//! anomaly classification → finalized rows.
//!
//! Everything is a pure function of (input batches, [`PipelineConfig`]);
//! there is no persistent state between runs. Run-level failures
//! ([`PipelineError`]) abort before any row is produced, so a caller that
//! stages its sink output gets all-or-nothing emission for free.

pub mod aggregate;
pub mod anomaly;
pub mod baseline;
pub mod config;
pub mod error;
pub mod finalize;
pub mod merge;
pub mod report;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use report::RunReport;

use svt_core::reading::BatchOutcome;
use svt_core::series::TrafficRow;

/// The finalized table plus the run's bookkeeping.
#[derive(Debug)]
pub struct PipelineRun {
    /// Output rows, sorted by (store_id, sensor_id, date).
    pub rows: Vec<TrafficRow>,
    pub report: RunReport,
}

/// Run the full pipeline over normalized input batches.
///
/// Each batch is the outcome of normalizing one source (readings plus the
/// rows that source rejected); rejections ride along into the run report.
/// Fails with [`PipelineError::EmptyInput`] when no valid readings remain
/// after merging.
pub fn run(batches: Vec<BatchOutcome>, config: &PipelineConfig) -> Result<PipelineRun, PipelineError> {
    let mut readings = Vec::new();
    let mut rejected = Vec::new();
    for batch in batches {
        readings.push(batch.readings);
        rejected.extend(batch.rejected);
    }
    let readings_in = readings.iter().map(|b| b.len() as u64).sum();

    let merged = merge::merge_batches(readings);
    if merged.readings.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let points = aggregate::aggregate_daily(&merged.readings);
    aggregate::verify_series_integrity(&points)?;

    let enriched: Vec<_> = baseline::compute_baselines(points, config.baseline_window)
        .into_iter()
        .map(|(point, moving_average)| {
            anomaly::classify(point, moving_average, config.anomaly_threshold_pct)
        })
        .collect();

    let readings_kept = merged.readings.len() as u64;
    let rows: Vec<TrafficRow> = finalize::finalize(enriched).collect();
    let report = RunReport {
        readings_in,
        readings_kept,
        duplicates: merged.duplicates,
        rejected,
        rows_out: rows.len() as u64,
    };

    Ok(PipelineRun { rows, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use svt_core::dates::parse_date;
    use svt_core::reading::{parse_readings, RawReading};

    fn reading(store: &str, sensor: u8, date: &str, count: u32) -> RawReading {
        RawReading {
            date: parse_date(date).unwrap(),
            time_of_day: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            store_id: store.to_string(),
            sensor_id: sensor,
            visitor_count: count,
        }
    }

    fn batch(readings: Vec<RawReading>) -> BatchOutcome {
        BatchOutcome {
            readings,
            rejected: Vec::new(),
        }
    }

    #[test]
    fn test_empty_input_fails_the_run() {
        let err = run(vec![batch(vec![])], &PipelineConfig::default()).unwrap_err();
        assert_eq!(err, PipelineError::EmptyInput);
        let err = run(vec![], &PipelineConfig::default()).unwrap_err();
        assert_eq!(err, PipelineError::EmptyInput);
    }

    #[test]
    fn test_idempotence_same_input_same_rows() {
        let make_input = || {
            vec![
                batch(vec![
                    reading("Paris", 1, "2025-01-08", 120),
                    reading("Lille", 0, "2025-01-06", 100),
                    reading("Lille", 0, "2025-01-07", 110),
                ]),
                batch(vec![
                    reading("Paris", 1, "2025-01-06", 90),
                    reading("Lille", 0, "2025-01-08", 105),
                ]),
            ]
        };
        let first = run(make_input(), &PipelineConfig::default()).unwrap();
        let second = run(make_input(), &PipelineConfig::default()).unwrap();
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn test_conservation_after_dedup() {
        // Two sources overlap on one reading; daily_traffic must equal the
        // sum of distinct readings only.
        let input = vec![
            batch(vec![
                reading("Lille", 0, "2025-01-06", 100),
                reading("Lille", 0, "2025-01-06", 100), // same time: duplicate
            ]),
            batch(vec![reading("Lille", 0, "2025-01-06", 100)]), // duplicate again
        ];
        let result = run(input, &PipelineConfig::default()).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].daily_traffic, 100);
        assert_eq!(result.report.duplicates, 2);
        assert_eq!(result.report.readings_kept, 1);
    }

    #[test]
    fn test_output_sorted_by_store_sensor_date() {
        let input = vec![batch(vec![
            reading("Paris", 0, "2025-01-07", 1),
            reading("Lille", 7, "2025-01-06", 2),
            reading("Lille", 2, "2025-01-09", 3),
            reading("Paris", 0, "2025-01-06", 4),
        ])];
        let result = run(input, &PipelineConfig::default()).unwrap();
        let order: Vec<(String, u8, String)> = result
            .rows
            .iter()
            .map(|r| (r.store_id.clone(), r.sensor_id, r.date.to_string()))
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_fourth_day_spike_scenario() {
        // 4 prior days averaging 100, then a day at 250: +150%, anomalous.
        let input = vec![batch(vec![
            reading("Lille", 0, "2025-01-06", 90),
            reading("Lille", 0, "2025-01-07", 100),
            reading("Lille", 0, "2025-01-08", 110),
            reading("Lille", 0, "2025-01-09", 100),
            reading("Lille", 0, "2025-01-10", 250),
        ])];
        let result = run(input, &PipelineConfig::default()).unwrap();
        let spike = &result.rows[4];
        assert_eq!(spike.moving_average_4w, Some(100.0));
        assert_eq!(spike.pct_change, Some(150.0));
        assert!(spike.is_anomaly);
        // Every earlier day lacks a full window.
        assert!(result.rows[..4]
            .iter()
            .all(|r| r.moving_average_4w.is_none() && !r.is_anomaly));
    }

    #[test]
    fn test_three_prior_days_with_shortened_window() {
        // With the window shortened to 3, a 4th day at double the average
        // of the first three gets that average as its baseline and trips
        // the 50% threshold.
        let config = PipelineConfig {
            baseline_window: 3,
            ..Default::default()
        };
        let input = vec![batch(vec![
            reading("Lyon", 2, "2025-01-06", 100),
            reading("Lyon", 2, "2025-01-07", 110),
            reading("Lyon", 2, "2025-01-08", 120),
            reading("Lyon", 2, "2025-01-09", 220),
        ])];
        let result = run(input, &config).unwrap();
        let fourth = &result.rows[3];
        assert_eq!(fourth.moving_average_4w, Some(110.0));
        assert_eq!(fourth.pct_change, Some(100.0));
        assert!(fourth.is_anomaly);
    }

    #[test]
    fn test_short_series_scenario() {
        let input = vec![batch(vec![
            reading("Marseille", 5, "2025-01-06", 500),
            reading("Marseille", 5, "2025-01-07", 5000),
            reading("Marseille", 5, "2025-01-08", 50),
        ])];
        let result = run(input, &PipelineConfig::default()).unwrap();
        assert_eq!(result.rows.len(), 3);
        for row in &result.rows {
            assert!(row.moving_average_4w.is_none());
            assert!(row.pct_change.is_none());
            assert!(!row.is_anomaly);
        }
    }

    #[test]
    fn test_invalid_sensor_reported_and_excluded() {
        let csv = "\
date,heure,id_du_capteur,id_du_magasin,nombre_visiteurs,unite
2025-01-06,12:00:00,0,Lille,100,visiteurs
2025-01-06,12:00:00,9,Lille,9999,visiteurs
";
        let outcome = parse_readings("january.csv", csv).unwrap();
        let result = run(vec![outcome], &PipelineConfig::default()).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].daily_traffic, 100);
        assert_eq!(result.report.rejected.len(), 1);
        assert_eq!(result.report.rejected[0].source, "january.csv");
    }

    #[test]
    fn test_range_validity() {
        let input = vec![batch(vec![
            reading("Lille", 0, "2025-01-06", 100),
            reading("Lille", 7, "2025-01-06", 0),
        ])];
        let result = run(input, &PipelineConfig::default()).unwrap();
        for row in &result.rows {
            assert!(row.sensor_id <= 7);
            // daily_traffic is unsigned; just confirm the zero-count day
            // survives as a row.
        }
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_weekday_attached() {
        let input = vec![batch(vec![reading("Lille", 0, "2025-01-06", 100)])];
        let result = run(input, &PipelineConfig::default()).unwrap();
        assert_eq!(result.rows[0].day_of_week, "Monday");
    }
}
