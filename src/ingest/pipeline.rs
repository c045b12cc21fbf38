use crate::db::Database;
use crate::detection::{AlertDecision, AlertSink, Detection, RunDetector};
use crate::error::Result;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReceipt {
    pub detection: Detection,
    pub decision: AlertDecision,
    /// False when the store rejected the row; the detector already saw it.
    pub stored: bool,
}

/// Feeds detections through the run detector, the alert sink and the store,
/// in that order.
pub struct IngestPipeline<S> {
    db: Database,
    detector: RunDetector,
    sink: S,
}

impl<S: AlertSink> IngestPipeline<S> {
    pub fn new(db: Database, sink: S) -> Self {
        Self {
            db,
            detector: RunDetector::new(),
            sink,
        }
    }

    pub fn detector(&self) -> &RunDetector {
        &self.detector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ingest a raw `(timestamp, category)` pair. Malformed input is returned
    /// as an error and never reaches the detector or the store.
    pub async fn ingest(&mut self, timestamp: &str, category: &str) -> Result<IngestReceipt> {
        let detection = Detection::parse(timestamp, category)?;
        Ok(self.ingest_detection(detection).await)
    }

    pub async fn ingest_detection(&mut self, detection: Detection) -> IngestReceipt {
        let decision = self
            .detector
            .observe(detection.timestamp, detection.category);
        if let AlertDecision::Alert { run_start, run_end } = decision {
            self.sink.notify(run_start, run_end);
        }

        let stored = match self.db.insert_detection(&detection).await {
            Ok(_) => {
                log_info!("Data ingested successfully.");
                true
            }
            Err(err) => {
                log_error!("Error ingesting data: {err:#}");
                false
            }
        };

        IngestReceipt {
            detection,
            decision,
            stored,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    use super::*;
    use crate::error::DetectionError;

    /// Collects alerts for assertions.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        pub alerts: Arc<Mutex<Vec<(NaiveDateTime, NaiveDateTime)>>>,
    }

    impl AlertSink for RecordingSink {
        fn notify(&mut self, run_start: NaiveDateTime, run_end: NaiveDateTime) {
            self.alerts.lock().unwrap().push((run_start, run_end));
        }
    }

    fn pipeline(dir: &TempDir) -> IngestPipeline<RecordingSink> {
        let db = Database::new(dir.path().join("detections.sqlite3")).unwrap();
        IngestPipeline::new(db, RecordingSink::default())
    }

    #[tokio::test]
    async fn alerts_and_persists_every_detection() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = pipeline(&dir);

        let rows = [
            ("2023-08-10T09:00:00", "pedestrian"),
            ("2023-08-10T09:00:20", "bicycle"),
            ("2023-08-10T09:00:25", "van"),
            ("2023-08-10T09:00:40", "pedestrian"),
            ("2023-08-10T09:01:00", "pedestrian"),
            ("2023-08-10T09:01:20", "pedestrian"),
            ("2023-08-10T09:01:40", "pedestrian"),
        ];
        let mut receipts = Vec::new();
        for (timestamp, category) in rows {
            receipts.push(pipeline.ingest(timestamp, category).await.unwrap());
        }

        assert!(receipts.iter().all(|r| r.stored));
        let alerting: Vec<bool> = receipts.iter().map(|r| r.decision.is_alert()).collect();
        assert_eq!(alerting, vec![false, false, false, false, false, true, true]);

        let alerts = pipeline.sink().alerts.lock().unwrap().clone();
        assert_eq!(alerts.len(), 2);
        assert!(alerts
            .iter()
            .all(|(start, _)| *start == receipts[0].detection.timestamp));

        assert_eq!(pipeline.db.count_detections().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn malformed_input_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = pipeline(&dir);

        let err = pipeline
            .ingest("10/08/2023 18:30", "pedestrian")
            .await
            .unwrap_err();
        assert!(matches!(err, DetectionError::Parse { .. }));

        let err = pipeline
            .ingest("2023-08-10T18:30:30", "scooter")
            .await
            .unwrap_err();
        assert!(matches!(err, DetectionError::UnknownCategory(_)));

        assert_eq!(pipeline.db.count_detections().await.unwrap(), 0);
        assert_eq!(pipeline.detector().state().run_length, 0);
    }

    #[tokio::test]
    async fn store_failure_is_logged_not_raised() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = pipeline(&dir);

        pipeline
            .db
            .execute(|conn| {
                conn.execute_batch("DROP TABLE detections")?;
                Ok(())
            })
            .await
            .unwrap();

        let receipt = pipeline
            .ingest("2023-08-10T18:30:30", "pedestrian")
            .await
            .unwrap();
        assert!(!receipt.stored);
        // The detector still counted it
        assert_eq!(pipeline.detector().state().run_length, 1);
    }
}
