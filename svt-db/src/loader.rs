//! Loading finalized traffic tables into the database.
//!
//! Two entry points: typed rows straight from the pipeline, or the output
//! CSV written by the persistence sink. Both load inside one transaction
//! so a failed load leaves the database unchanged (all-or-nothing).

use crate::Database;
use rusqlite::params;
use svt_core::dates;
use svt_core::series::TrafficRow;

impl Database {
    /// Load finalized rows produced by the pipeline.
    ///
    /// Runs in a single transaction: either every row lands or none do.
    /// Re-loading a (store, sensor, date) row replaces the previous one.
    pub fn load_rows(&self, rows: &[TrafficRow]) -> anyhow::Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO daily_traffic
                 (store_id, sensor_id, date, daily_traffic,
                  moving_average_4w, pct_change, day_of_week, is_anomaly)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.store_id,
                    row.sensor_id,
                    dates::format_date(&row.date),
                    row.daily_traffic as i64,
                    row.moving_average_4w,
                    row.pct_change,
                    row.day_of_week,
                    row.is_anomaly,
                ])?;
            }
        }
        tx.commit()?;
        log::info!("loader: loaded {} traffic rows", rows.len());
        Ok(())
    }

    /// Load a finalized traffic table from its output CSV form (with
    /// headers). Empty optional fields become NULL.
    pub fn load_traffic_csv(&self, csv_data: &str) -> anyhow::Result<()> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());
        let rows = rdr
            .deserialize::<TrafficRow>()
            .collect::<Result<Vec<_>, _>>()?;
        self.load_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    const TABLE_CSV: &str = "\
date,store_id,sensor_id,daily_traffic,moving_average_4w,pct_change,day_of_week,is_anomaly
2025-01-06,Lille,0,100,,,Monday,false
2025-01-07,Lille,0,110,,,Tuesday,false
2025-01-10,Lille,0,250,100.0,150.0,Friday,true
2025-01-06,Paris,3,400,,,Monday,false
";

    #[test]
    fn load_traffic_csv_inserts_all_rows() {
        let db = Database::new().unwrap();
        db.load_traffic_csv(TABLE_CSV).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_traffic", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);

        let ma: Option<f64> = conn
            .query_row(
                "SELECT moving_average_4w FROM daily_traffic
                 WHERE store_id = 'Lille' AND sensor_id = 0 AND date = '2025-01-06'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(ma.is_none(), "Absent baseline should load as NULL");
    }

    #[test]
    fn load_replaces_on_conflict() {
        let db = Database::new().unwrap();
        db.load_traffic_csv(TABLE_CSV).unwrap();
        db.load_traffic_csv(TABLE_CSV).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_traffic", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4, "Re-loading the same table should not duplicate rows");
    }

    #[test]
    fn load_rejects_malformed_csv_without_partial_insert() {
        let db = Database::new().unwrap();
        let bad = "\
date,store_id,sensor_id,daily_traffic,moving_average_4w,pct_change,day_of_week,is_anomaly
2025-01-06,Lille,0,100,,,Monday,false
not-a-date,Lille,0,xyz,,,Monday,false
";
        assert!(db.load_traffic_csv(bad).is_err());

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_traffic", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "Failed load must leave the table untouched");
    }
}
