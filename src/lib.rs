pub mod aggregation;
pub mod db;
pub mod demo;
pub mod detection;
pub mod error;
pub mod ingest;
pub mod settings;
mod utils;

use std::time::Duration;

use anyhow::Context;
use db::Database;
use log::{info, warn};
use settings::SettingsStore;

pub use aggregation::{aggregate, AggregationOutcome, AggregationReport, Period};
pub use detection::{classify, AlertDecision, Category, Detection, RunDetector, SuperCategory};
pub use error::DetectionError;

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Detection monitor starting up...");

    let settings_store = SettingsStore::from_env()?;
    let settings = settings_store.settings();
    info!("Using settings from {}", settings_store.path().display());

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        let database = Database::new(settings.database_path.clone())?;

        let outcome = demo::replay(
            &database,
            &demo::DEMO_DETECTIONS,
            Duration::from_millis(settings.replay_interval_ms),
        )
        .await?;

        if let AggregationOutcome::Recovered { error, .. } = &outcome {
            warn!("Reporting empty aggregation: {error}");
        }

        let report = serde_json::to_string_pretty(outcome.report())
            .context("failed to serialize aggregation report")?;
        println!("{report}");

        Ok::<(), anyhow::Error>(())
    })
}
