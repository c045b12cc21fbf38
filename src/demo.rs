//! Replays a fixed detection feed through the ingest worker, then prints the
//! aggregated occupancy report.

use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::aggregation::{aggregate_detections, AggregationOutcome};
use crate::db::Database;
use crate::detection::LogAlertSink;
use crate::ingest::{spawn_ingest_worker, IngestPipeline};

/// Detections as a camera sampling every 30 seconds would report them.
pub const DEMO_DETECTIONS: [(&str, &str); 9] = [
    ("2023-08-10T18:30:30", "pedestrian"),
    ("2023-08-10T18:31:00", "pedestrian"),
    ("2023-08-10T18:31:00", "car"),
    ("2023-08-10T18:31:30", "pedestrian"),
    ("2023-08-10T18:35:00", "pedestrian"),
    ("2023-08-10T18:35:30", "pedestrian"),
    ("2023-08-10T18:36:00", "pedestrian"),
    ("2023-08-10T18:37:00", "pedestrian"),
    ("2023-08-10T18:37:30", "pedestrian"),
];

pub async fn replay(
    db: &Database,
    detections: &[(&str, &str)],
    interval: Duration,
) -> Result<AggregationOutcome> {
    let cancel_token = CancellationToken::new();
    let pipeline = IngestPipeline::new(db.clone(), LogAlertSink);
    let (handle, worker) = spawn_ingest_worker(pipeline, cancel_token.clone());

    let mut ticker = (!interval.is_zero()).then(|| tokio::time::interval(interval));
    for (timestamp, category) in detections {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        if let Err(err) = handle.submit(timestamp, category).await {
            warn!("skipping detection ({timestamp}, {category}): {err:#}");
        }
    }

    drop(handle);
    let pipeline = worker.await?;
    info!(
        "replayed {} detections; current run length {}",
        detections.len(),
        pipeline.detector().state().run_length
    );

    Ok(aggregate_detections(db).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn demo_feed_produces_expected_report() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("demo.sqlite3")).unwrap();

        let outcome = replay(&db, &DEMO_DETECTIONS, Duration::ZERO).await.unwrap();
        assert!(!outcome.is_recovered());
        assert_eq!(
            outcome.report().to_json().unwrap(),
            concat!(
                r#"{"people":[["2023-08-10T18:30:30","2023-08-10T18:31:30"],"#,
                r#"["2023-08-10T18:35:00","2023-08-10T18:36:00"],"#,
                r#"["2023-08-10T18:37:00","2023-08-10T18:37:30"]],"#,
                r#""vehicles":[["2023-08-10T18:31:00","2023-08-10T18:31:00"]]}"#
            )
        );
        assert_eq!(db.count_detections().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn bad_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("demo.sqlite3")).unwrap();

        let feed = [
            ("2023-08-10T18:30:30", "pedestrian"),
            ("not-a-time", "pedestrian"),
            ("2023-08-10T18:31:00", "rickshaw"),
        ];
        let outcome = replay(&db, &feed, Duration::ZERO).await.unwrap();
        assert_eq!(outcome.report().people().len(), 1);
        assert_eq!(db.count_detections().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unreadable_history_recovers_to_empty_report() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("demo.sqlite3")).unwrap();
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO detections (time, type) VALUES ('18:30', 'pedestrian')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let outcome = aggregate_detections(&db).await;
        assert!(outcome.is_recovered());
        assert!(outcome.report().is_empty());
        assert_eq!(
            outcome.into_report().to_json().unwrap(),
            r#"{"people":[],"vehicles":[]}"#
        );
    }
}
