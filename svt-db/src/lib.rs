//! In-memory SQLite layer for finalized visitor traffic tables.
//!
//! The pipeline emits a finalized table; this crate is the read-only query
//! surface on top of it. A finalized table (as `TrafficRow`s or as output
//! CSV) is loaded into an in-memory SQLite database, and typed query
//! methods cover the lookups downstream consumers need: by store, by
//! (store, sensor), by date range, and anomalies only.
//!
//! # Usage
//!
//! ```rust
//! use svt_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_traffic_csv(
//!     "date,store_id,sensor_id,daily_traffic,moving_average_4w,pct_change,day_of_week,is_anomaly\n\
//!      2025-01-10,Lille,0,250,100.0,150.0,Friday,true\n",
//! )
//! .unwrap();
//!
//! let stores = db.query_stores().unwrap();
//! assert_eq!(stores, vec!["Lille".to_string()]);
//! let anomalies = db.query_anomalies(None, None, None).unwrap();
//! assert_eq!(anomalies.len(), 1);
//! ```
//!
//! # Tables
//!
//! One table, `daily_traffic`, keyed on (store_id, sensor_id, date); see
//! [`schema::create_schema`]. The primary key plus the date index make the
//! query surface efficient without further index structures.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding one finalized traffic table.
///
/// Cheaply cloneable via `Rc`; clones share the same underlying
/// connection. Intended for single-threaded, post-hoc querying.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new empty in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
