//! Run-level pipeline errors.
//!
//! Per-record problems (rejected rows, duplicates) are not errors; they are
//! accumulated into the [`crate::report::RunReport`]. The variants here
//! abort the run before anything reaches the persistence collaborator.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The merged collection contained zero readings; emitting an empty
    /// table would be misleading, so the run fails instead.
    #[error("no readings to process after merging input sources")]
    EmptyInput,

    /// Two daily points exist for the same (store, sensor, date) after
    /// aggregation. This is an aggregation logic bug, never expected with
    /// correct grouping.
    #[error("duplicate daily point for store {store_id} sensor {sensor_id} on {date}")]
    SeriesIntegrity {
        store_id: String,
        sensor_id: u8,
        date: NaiveDate,
    },
}
