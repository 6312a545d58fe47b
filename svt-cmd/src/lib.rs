//! Command implementations for the svt CLI.
//!
//! Provides subcommands for collecting raw visitor data, running the
//! aggregation-and-anomaly pipeline over raw monthly CSV files, and
//! querying a finalized traffic table.

use clap::Subcommand;

pub mod collect;
pub mod process;
pub mod query;

#[derive(Subcommand)]
pub enum Command {
    /// Process raw visitor CSV files into the finalized daily traffic table
    Process {
        /// Directory containing raw visiteurs_YYYY-MM.csv files
        #[arg(short = 'r', long)]
        raw_dir: String,

        /// Output path for the finalized traffic table CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        /// Number of prior recorded days in the moving-average window
        #[arg(long, default_value_t = svt_pipeline::config::DEFAULT_BASELINE_WINDOW)]
        window: usize,

        /// Anomaly threshold as an absolute percent deviation
        #[arg(long, default_value_t = svt_pipeline::config::DEFAULT_ANOMALY_THRESHOLD_PCT)]
        threshold: f64,
    },

    /// Collect raw visitor counts from the store API into monthly CSV files
    Collect {
        /// Base URL of the visitor count API
        #[arg(long, default_value = "http://127.0.0.1:8000/")]
        base_url: String,

        /// Directory to write visiteurs_YYYY-MM.csv files into
        #[arg(short = 'd', long)]
        output_dir: String,

        /// First date to collect (YYYY-MM-DD, inclusive)
        #[arg(long)]
        start: String,

        /// Last date to collect (YYYY-MM-DD, inclusive)
        #[arg(long)]
        end: String,
    },

    /// Print anomalous days from a finalized traffic table as JSON
    Anomalies {
        /// Path to a finalized traffic table CSV
        #[arg(short = 't', long)]
        traffic_csv: String,

        /// Only report anomalies for this store
        #[arg(long)]
        store: Option<String>,

        /// Start of the date range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        start: Option<String>,

        /// End of the date range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        end: Option<String>,
    },

    /// Print descriptive metrics for one (store, sensor) series as JSON
    Metrics {
        /// Path to a finalized traffic table CSV
        #[arg(short = 't', long)]
        traffic_csv: String,

        #[arg(long)]
        store: String,

        /// Sensor id (0-7)
        #[arg(long)]
        sensor: u8,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Process {
            raw_dir,
            output_csv,
            window,
            threshold,
        } => process::run_process(&raw_dir, &output_csv, window, threshold),
        Command::Collect {
            base_url,
            output_dir,
            start,
            end,
        } => collect::run_collect(&base_url, &output_dir, &start, &end).await,
        Command::Anomalies {
            traffic_csv,
            store,
            start,
            end,
        } => query::run_anomalies(
            &traffic_csv,
            store.as_deref(),
            start.as_deref(),
            end.as_deref(),
        ),
        Command::Metrics {
            traffic_csv,
            store,
            sensor,
        } => query::run_metrics(&traffic_csv, &store, sensor),
    }
}
