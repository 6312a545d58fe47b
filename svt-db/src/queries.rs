//! Typed query methods over the finalized traffic table.
//!
//! The surface is read-only and post-hoc: lookups by store, by
//! (store, sensor), date-range filters, anomaly filters, and per-sensor
//! descriptive metrics. All results come back ordered by
//! (store_id, sensor_id, date), the table's native order.

use crate::models::{SensorMetrics, TrafficRecord};
use crate::Database;
use rusqlite::{params, Row};

// Date filters compare ISO-8601 strings; these bounds make the filters
// optional without a second query shape.
const DATE_MIN: &str = "0000-01-01";
const DATE_MAX: &str = "9999-12-31";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TrafficRecord> {
    Ok(TrafficRecord {
        date: row.get(0)?,
        store_id: row.get(1)?,
        sensor_id: row.get(2)?,
        daily_traffic: row.get(3)?,
        moving_average_4w: row.get(4)?,
        pct_change: row.get(5)?,
        day_of_week: row.get(6)?,
        is_anomaly: row.get(7)?,
    })
}

const RECORD_COLUMNS: &str = "date, store_id, sensor_id, daily_traffic, \
                              moving_average_4w, pct_change, day_of_week, is_anomaly";

impl Database {
    /// List the distinct store ids present in the table, sorted.
    pub fn query_stores(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt =
            conn.prepare("SELECT DISTINCT store_id FROM daily_traffic ORDER BY store_id")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// List the distinct sensor ids recorded for one store, sorted.
    pub fn query_sensors(&self, store_id: &str) -> anyhow::Result<Vec<i64>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT sensor_id FROM daily_traffic
             WHERE store_id = ?1 ORDER BY sensor_id",
        )?;
        let rows = stmt
            .query_map(params![store_id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(rows)
    }

    /// Get all traffic rows for one store, optionally bounded by an
    /// inclusive [start, end] date range.
    pub fn query_store_traffic(
        &self,
        store_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> anyhow::Result<Vec<TrafficRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM daily_traffic
             WHERE store_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY store_id, sensor_id, date"
        ))?;
        let rows = stmt
            .query_map(
                params![
                    store_id,
                    start_date.unwrap_or(DATE_MIN),
                    end_date.unwrap_or(DATE_MAX)
                ],
                record_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: store {} returned {} records",
            store_id,
            rows.len()
        );
        Ok(rows)
    }

    /// Get all traffic rows for one (store, sensor) series, optionally
    /// bounded by an inclusive [start, end] date range.
    pub fn query_sensor_traffic(
        &self,
        store_id: &str,
        sensor_id: u8,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> anyhow::Result<Vec<TrafficRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM daily_traffic
             WHERE store_id = ?1 AND sensor_id = ?2 AND date >= ?3 AND date <= ?4
             ORDER BY date"
        ))?;
        let rows = stmt
            .query_map(
                params![
                    store_id,
                    sensor_id,
                    start_date.unwrap_or(DATE_MIN),
                    end_date.unwrap_or(DATE_MAX)
                ],
                record_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: store {} sensor {} returned {} records",
            store_id,
            sensor_id,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the rows flagged anomalous, optionally filtered by store and
    /// bounded by an inclusive [start, end] date range.
    pub fn query_anomalies(
        &self,
        store_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> anyhow::Result<Vec<TrafficRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM daily_traffic
             WHERE is_anomaly = 1
               AND (?1 IS NULL OR store_id = ?1)
               AND date >= ?2 AND date <= ?3
             ORDER BY store_id, sensor_id, date"
        ))?;
        let rows = stmt
            .query_map(
                params![
                    store_id,
                    start_date.unwrap_or(DATE_MIN),
                    end_date.unwrap_or(DATE_MAX)
                ],
                record_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: anomalies returned {} records", rows.len());
        Ok(rows)
    }

    /// Descriptive statistics for one (store, sensor) series, or `None`
    /// when the series has no rows.
    pub fn query_sensor_metrics(
        &self,
        store_id: &str,
        sensor_id: u8,
    ) -> anyhow::Result<Option<SensorMetrics>> {
        let conn = self.conn.borrow();
        let metrics = conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date),
                    AVG(daily_traffic), MIN(daily_traffic), MAX(daily_traffic),
                    SUM(is_anomaly)
             FROM daily_traffic
             WHERE store_id = ?1 AND sensor_id = ?2",
            params![store_id, sensor_id],
            |row| {
                let data_points: i64 = row.get(0)?;
                if data_points == 0 {
                    return Ok(None);
                }
                let anomaly_count: i64 = row.get(6)?;
                Ok(Some(SensorMetrics {
                    store_id: store_id.to_string(),
                    sensor_id: sensor_id as i64,
                    data_points,
                    first_date: row.get(1)?,
                    last_date: row.get(2)?,
                    mean_traffic: row.get(3)?,
                    min_traffic: row.get(4)?,
                    max_traffic: row.get(5)?,
                    anomaly_count,
                    anomaly_pct: anomaly_count as f64 / data_points as f64 * 100.0,
                }))
            },
        )?;
        Ok(metrics)
    }
}
