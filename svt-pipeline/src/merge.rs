//! Merging reading batches from multiple sources into one deduplicated
//! collection.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;
use svt_core::reading::RawReading;

/// Result of merging all input batches.
#[derive(Debug)]
pub struct MergeOutcome {
    pub readings: Vec<RawReading>,
    /// Number of duplicate readings dropped (first-seen wins).
    pub duplicates: u64,
}

type DedupKey = (String, u8, NaiveDate, NaiveTime);

/// Merge an arbitrary number of reading batches into one collection.
///
/// Two readings with identical (store, sensor, date, time) are duplicates:
/// the first one seen is kept, later ones are dropped and counted so they
/// can be reported rather than summed twice. The order of the input batches
/// carries no meaning beyond breaking those ties; output ordering is
/// unspecified, downstream grouping sorts for itself.
pub fn merge_batches(batches: Vec<Vec<RawReading>>) -> MergeOutcome {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut readings = Vec::new();
    let mut duplicates = 0u64;

    for batch in batches {
        for reading in batch {
            let key = (
                reading.store_id.clone(),
                reading.sensor_id,
                reading.date,
                reading.time_of_day,
            );
            if seen.insert(key) {
                readings.push(reading);
            } else {
                duplicates += 1;
                log::debug!(
                    "dropping duplicate reading: {} sensor {} at {} {}",
                    reading.store_id,
                    reading.sensor_id,
                    reading.date,
                    reading.time_of_day
                );
            }
        }
    }

    MergeOutcome {
        readings,
        duplicates,
    }
}
