//! Core types for the store visitor traffic toolkit.
//!
//! Holds the domain model shared by the pipeline, database, and CLI crates:
//! raw sensor readings with CSV normalization, per-series aggregates, the
//! finalized output row, and date helpers.

pub mod dates;
pub mod reading;
pub mod series;
