//! Collect command: fetch raw visitor counts from the store API and write
//! monthly raw CSV files.
//!
//! The API takes `store_name`, `year`, `month`, `day`, and `sensor_id`
//! query parameters and returns one JSON number: the visitor count seen by
//! that sensor on that day.

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Weekday};
use log::info;
use std::collections::BTreeMap;
use svt_core::dates::{self, DateRange};

/// The stores covered by the collector.
pub const STORES: [&str; 5] = ["Lille", "Paris", "Lyon", "Toulouse", "Marseille"];

/// Sensors per store: ids 0 through 7.
pub const SENSORS_PER_STORE: u8 = 8;

/// Raw CSV header written at the top of each monthly file.
const RAW_HEADER: &str = "date,heure,id_du_capteur,id_du_magasin,nombre_visiteurs,unite";

async fn fetch_count(
    client: &reqwest::Client,
    base_url: &str,
    store: &str,
    sensor_id: u8,
    date: NaiveDate,
) -> anyhow::Result<f64> {
    let response = client
        .get(base_url)
        .query(&[
            ("store_name", store.to_string()),
            ("year", date.year().to_string()),
            ("month", date.month().to_string()),
            ("day", date.day().to_string()),
            ("sensor_id", sensor_id.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json::<f64>().await?)
}

/// Collect visitor counts for every store and sensor over an inclusive
/// date range, writing one `visiteurs_YYYY-MM.csv` per month.
///
/// Sundays are skipped (stores are closed). A failed fetch skips that
/// single sample with a log line rather than aborting the collection.
pub async fn run_collect(
    base_url: &str,
    output_dir: &str,
    start: &str,
    end: &str,
) -> anyhow::Result<()> {
    let start = dates::parse_date(start).with_context(|| format!("bad start date {start:?}"))?;
    let end = dates::parse_date(end).with_context(|| format!("bad end date {end:?}"))?;
    std::fs::create_dir_all(output_dir)?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    // month ("YYYY-MM") -> raw CSV lines
    let mut monthly: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for date in (DateRange { start, end }) {
        if date.weekday() == Weekday::Sun {
            continue;
        }
        for store in STORES {
            for sensor_id in 0..SENSORS_PER_STORE {
                let count = match fetch_count(&client, base_url, store, sensor_id, date).await {
                    Ok(c) => c,
                    Err(e) => {
                        info!("skipping {store} sensor {sensor_id} on {date}: {e}");
                        continue;
                    }
                };
                monthly
                    .entry(date.format("%Y-%m").to_string())
                    .or_default()
                    .push(format!(
                        "{},12:00:00,{},{},{},visiteurs",
                        dates::format_date(&date),
                        sensor_id,
                        store,
                        count
                    ));
            }
        }
        // Be polite to the API
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    for (month, lines) in &monthly {
        let path = format!("{output_dir}/visiteurs_{month}.csv");
        let mut contents = String::with_capacity(lines.len() * 48 + RAW_HEADER.len());
        contents.push_str(RAW_HEADER);
        contents.push('\n');
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path))?;
        info!("wrote {} rows to {}", lines.len(), path);
    }

    info!(
        "collection complete: {} monthly files in {}",
        monthly.len(),
        output_dir
    );
    Ok(())
}
