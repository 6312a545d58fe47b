//! Query commands over a finalized traffic table.

use anyhow::Context;
use log::info;
use svt_db::Database;

fn load_table(traffic_csv: &str) -> anyhow::Result<Database> {
    let data = std::fs::read_to_string(traffic_csv)
        .with_context(|| format!("failed to read {}", traffic_csv))?;
    let db = Database::new()?;
    db.load_traffic_csv(&data)?;
    Ok(db)
}

/// Print the anomalous days of a finalized table as JSON, optionally
/// filtered by store and date range.
pub fn run_anomalies(
    traffic_csv: &str,
    store: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<()> {
    let db = load_table(traffic_csv)?;
    let anomalies = db.query_anomalies(store, start, end)?;
    info!("{} anomalous days in {}", anomalies.len(), traffic_csv);
    println!("{}", serde_json::to_string_pretty(&anomalies)?);
    Ok(())
}

/// Print descriptive metrics for one (store, sensor) series as JSON.
pub fn run_metrics(traffic_csv: &str, store: &str, sensor: u8) -> anyhow::Result<()> {
    let db = load_table(traffic_csv)?;
    let metrics = db
        .query_sensor_metrics(store, sensor)?
        .with_context(|| format!("no rows for store {store} sensor {sensor}"))?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
