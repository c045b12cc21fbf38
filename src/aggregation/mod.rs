//! Offline occupancy aggregation.
//!
//! Collapses the full detection history into contiguous periods per
//! super-category. The merge itself is a linear gap scan over ordered
//! timestamps (see [`merge::merge_periods`]); the store is only used to read
//! the history back.

pub mod merge;
pub mod report;

pub use merge::{merge_periods, Period, PERIOD_GAP_SECS};
pub use report::AggregationReport;

use log::error;

use crate::db::Database;
use crate::detection::{Detection, SuperCategory};
use crate::error::{DetectionError, Result};

/// Pure aggregation over an already-loaded event sequence.
pub fn aggregate(events: &[Detection]) -> AggregationReport {
    let mut report = AggregationReport::empty();

    for super_category in SuperCategory::ALL {
        let timestamps = events
            .iter()
            .filter(|event| event.super_category() == super_category)
            .map(|event| event.timestamp)
            .collect();
        report.insert(super_category, merge_periods(super_category, timestamps));
    }

    report
}

/// Aggregate raw `(timestamp, category)` rows. Malformed rows are rejected.
pub fn aggregate_records<'a, I>(records: I) -> Result<AggregationReport>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let events = records
        .into_iter()
        .map(|(timestamp, category)| Detection::parse(timestamp, category))
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate(&events))
}

/// Result of a best-effort aggregation over the store.
#[derive(Debug)]
pub enum AggregationOutcome {
    Complete(AggregationReport),
    /// The history could not be read; `report` is the empty default.
    Recovered {
        report: AggregationReport,
        error: DetectionError,
    },
}

impl AggregationOutcome {
    pub fn report(&self) -> &AggregationReport {
        match self {
            AggregationOutcome::Complete(report) => report,
            AggregationOutcome::Recovered { report, .. } => report,
        }
    }

    pub fn into_report(self) -> AggregationReport {
        match self {
            AggregationOutcome::Complete(report) => report,
            AggregationOutcome::Recovered { report, .. } => report,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, AggregationOutcome::Recovered { .. })
    }
}

/// Read the full history from `db` and aggregate it. A failed read is logged
/// and reported as an empty report instead of an error.
pub async fn aggregate_detections(db: &Database) -> AggregationOutcome {
    match db.get_all_detections().await {
        Ok(events) => AggregationOutcome::Complete(aggregate(&events)),
        Err(err) => {
            error!("Error aggregating detections: {err:#}");
            AggregationOutcome::Recovered {
                report: AggregationReport::empty(),
                error: DetectionError::AggregationFailure(format!("{err:#}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{format_timestamp, Category};

    const DEMO_ROWS: [(&str, &str); 9] = [
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

    fn spans(periods: &[Period]) -> Vec<(String, String)> {
        periods
            .iter()
            .map(|p| (format_timestamp(&p.start), format_timestamp(&p.end)))
            .collect()
    }

    #[test]
    fn demo_history_collapses_into_expected_periods() {
        let report = aggregate_records(DEMO_ROWS).unwrap();

        assert_eq!(
            spans(report.people()),
            vec![
                ("2023-08-10T18:30:30".into(), "2023-08-10T18:31:30".into()),
                ("2023-08-10T18:35:00".into(), "2023-08-10T18:36:00".into()),
                // 18:36:00 -> 18:37:00 is a full minute
                ("2023-08-10T18:37:00".into(), "2023-08-10T18:37:30".into()),
            ]
        );
        assert_eq!(
            spans(report.vehicles()),
            vec![("2023-08-10T18:31:00".into(), "2023-08-10T18:31:00".into())]
        );
        assert_eq!(
            report.to_json().unwrap(),
            concat!(
                r#"{"people":[["2023-08-10T18:30:30","2023-08-10T18:31:30"],"#,
                r#"["2023-08-10T18:35:00","2023-08-10T18:36:00"],"#,
                r#"["2023-08-10T18:37:00","2023-08-10T18:37:30"]],"#,
                r#""vehicles":[["2023-08-10T18:31:00","2023-08-10T18:31:00"]]}"#
            )
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let events: Vec<Detection> = DEMO_ROWS
            .iter()
            .map(|(t, c)| Detection::parse(t, c).unwrap())
            .collect();
        let first = aggregate(&events).to_json().unwrap();
        let second = aggregate(&events).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_history_keeps_both_keys() {
        let report = aggregate(&[]);
        assert!(report.people().is_empty());
        assert!(report.vehicles().is_empty());
        assert_eq!(report.to_json().unwrap(), r#"{"people":[],"vehicles":[]}"#);
    }

    #[test]
    fn categories_are_merged_independently() {
        // Interleaved vehicles do not bridge a people gap
        let events: Vec<Detection> = [
            ("2023-08-10T10:00:00", Category::Bicycle),
            ("2023-08-10T10:00:40", Category::Truck),
            ("2023-08-10T10:01:20", Category::Van),
            ("2023-08-10T10:01:30", Category::Pedestrian),
        ]
        .into_iter()
        .map(|(t, c)| Detection::new(crate::detection::parse_timestamp(t).unwrap(), c))
        .collect();

        let report = aggregate(&events);
        assert_eq!(report.people().len(), 2);
        assert_eq!(report.vehicles().len(), 1);
        assert!(report
            .people()
            .iter()
            .all(|p| p.super_category == SuperCategory::People));
    }

    #[test]
    fn malformed_record_is_propagated() {
        let err = aggregate_records([("2023-08-10T18:30:30", "pedestrian"), ("bad", "car")])
            .unwrap_err();
        assert!(matches!(err, DetectionError::Parse { .. }));
    }
}
