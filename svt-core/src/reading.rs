//! Raw sensor readings and CSV record normalization.
//!
//! Raw monthly files are CSV with headers:
//! `date,heure,id_du_capteur,id_du_magasin,nombre_visiteurs,unite`
//!
//! The trailing unit column is informational and may be absent; everything
//! else is validated field by field so a rejected row can be reported with
//! the exact reason instead of being silently dropped.

use crate::dates;
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

/// Minimum number of columns in a raw visitor CSV row (the unit column is
/// optional).
pub const MIN_CSV_ROW_LENGTH: usize = 5;

/// Highest valid sensor id; each store has sensors 0 through 7.
pub const SENSOR_ID_MAX: u8 = 7;

/// Reason a raw CSV row was rejected, naming the offending field and value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("row has {0} columns, expected at least {MIN_CSV_ROW_LENGTH}")]
    WrongColumnCount(usize),
    #[error("malformed date {0:?}")]
    MalformedDate(String),
    #[error("malformed time {0:?}")]
    MalformedTime(String),
    #[error("empty store id")]
    EmptyStoreId,
    #[error("non-numeric sensor id {0:?}")]
    MalformedSensorId(String),
    #[error("sensor id {0} outside 0..={SENSOR_ID_MAX}")]
    SensorIdOutOfRange(i64),
    #[error("non-numeric visitor count {0:?}")]
    MalformedCount(String),
    #[error("negative visitor count {0}")]
    NegativeCount(i64),
}

/// A single validated sensor sample.
///
/// Invariants, enforced by the normalizer:
/// - `sensor_id` lies in `0..=SENSOR_ID_MAX`
/// - `visitor_count` is non-negative (unsigned by construction)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawReading {
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub store_id: String,
    pub sensor_id: u8,
    pub visitor_count: u32,
}

impl TryFrom<&StringRecord> for RawReading {
    type Error = RecordError;

    fn try_from(record: &StringRecord) -> Result<Self, Self::Error> {
        if record.len() < MIN_CSV_ROW_LENGTH {
            return Err(RecordError::WrongColumnCount(record.len()));
        }
        let raw_date = record.get(0).unwrap_or("").trim();
        let date = dates::parse_date(raw_date)
            .map_err(|_| RecordError::MalformedDate(raw_date.to_string()))?;

        let raw_time = record.get(1).unwrap_or("").trim();
        let time_of_day = dates::parse_time(raw_time)
            .map_err(|_| RecordError::MalformedTime(raw_time.to_string()))?;

        let raw_sensor = record.get(2).unwrap_or("").trim();
        let sensor: i64 = raw_sensor
            .parse()
            .map_err(|_| RecordError::MalformedSensorId(raw_sensor.to_string()))?;
        if !(0..=SENSOR_ID_MAX as i64).contains(&sensor) {
            return Err(RecordError::SensorIdOutOfRange(sensor));
        }

        let store_id = record.get(3).unwrap_or("").trim();
        if store_id.is_empty() {
            return Err(RecordError::EmptyStoreId);
        }

        // The collector writes counts as floats ("1500.0"); accept any
        // integral numeric value.
        let raw_count = record.get(4).unwrap_or("").trim();
        let count: f64 = raw_count
            .parse()
            .map_err(|_| RecordError::MalformedCount(raw_count.to_string()))?;
        if !count.is_finite() || count.fract() != 0.0 || count > u32::MAX as f64 {
            return Err(RecordError::MalformedCount(raw_count.to_string()));
        }
        if count < 0.0 {
            return Err(RecordError::NegativeCount(count as i64));
        }

        Ok(RawReading {
            date,
            time_of_day,
            store_id: store_id.to_string(),
            sensor_id: sensor as u8,
            visitor_count: count as u32,
        })
    }
}

/// A rejected input row with enough context to diagnose the exclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Identity of the input source (typically the file name).
    pub source: String,
    /// 1-based line number within the source.
    pub line: u64,
    /// The offending row, re-joined with commas.
    pub raw: String,
    pub error: RecordError,
}

/// Outcome of normalizing one raw CSV source: the valid readings plus the
/// rows that were rejected.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub readings: Vec<RawReading>,
    pub rejected: Vec<RejectedRecord>,
}

/// Parse one raw visitor CSV source (with headers) into a batch of readings.
///
/// Invalid rows are collected into `rejected` rather than aborting the
/// batch; only a structurally unreadable CSV stream is a hard error.
pub fn parse_readings(source: &str, csv_data: &str) -> Result<BatchOutcome, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let mut outcome = BatchOutcome::default();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        match RawReading::try_from(&record) {
            Ok(reading) => outcome.readings.push(reading),
            Err(error) => {
                log::warn!("{source}:{line}: rejected row: {error}");
                outcome.rejected.push(RejectedRecord {
                    source: source.to_string(),
                    line,
                    raw: record.iter().collect::<Vec<_>>().join(","),
                    error,
                });
            }
        }
    }
    Ok(outcome)
}
