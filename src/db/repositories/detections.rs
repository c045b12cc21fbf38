use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{helpers::detection_from_columns, Database};
use crate::detection::{format_timestamp, Detection};

impl Database {
    /// Append a single detection.
    pub async fn insert_detection(&self, detection: &Detection) -> Result<i64> {
        let time = format_timestamp(&detection.timestamp);
        let kind = detection.category.as_str();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO detections (time, type) VALUES (?1, ?2)",
                params![time, kind],
            )
            .with_context(|| "failed to insert detection")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Full detection history, oldest first. Rows sharing a timestamp keep
    /// their insertion order.
    pub async fn get_all_detections(&self) -> Result<Vec<Detection>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT time, type
                 FROM detections
                 ORDER BY time ASC, id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut detections = Vec::new();
            while let Some(row) = rows.next()? {
                let time: String = row.get(0)?;
                let kind: String = row.get(1)?;
                detections.push(detection_from_columns(&time, &kind)?);
            }

            Ok(detections)
        })
        .await
    }

    pub async fn count_detections(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM detections", [], |row| row.get(0))?;
            u64::try_from(count).map_err(|_| anyhow::anyhow!("negative row count {count}"))
        })
        .await
    }
}
