//! SQL schema for the finalized traffic table.

/// Returns the full SQL schema as a single batch string.
///
/// One table, `daily_traffic`, with a (store_id, sensor_id, date) primary
/// key matching the finalized table's sort order, plus indexes for the
/// date-range and anomaly lookups. `moving_average_4w` and `pct_change`
/// are NULL exactly when the pipeline left them absent.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS daily_traffic (
        store_id TEXT NOT NULL,
        sensor_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        daily_traffic INTEGER NOT NULL,
        moving_average_4w REAL,
        pct_change REAL,
        day_of_week TEXT NOT NULL,
        is_anomaly INTEGER NOT NULL,
        PRIMARY KEY (store_id, sensor_id, date)
    );
    CREATE INDEX IF NOT EXISTS idx_traffic_date ON daily_traffic(date);
    CREATE INDEX IF NOT EXISTS idx_traffic_anomaly ON daily_traffic(is_anomaly);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_table_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='daily_traffic'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);

        for idx in ["idx_traffic_date", "idx_traffic_anomaly"] {
            let count: i64 = conn
                .query_row(
                    &format!(
                        "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='{}'",
                        idx
                    ),
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
