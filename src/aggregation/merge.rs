use chrono::{Duration, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::detection::{format_timestamp, SuperCategory};

/// Detections closer than this collapse into the same period.
pub const PERIOD_GAP_SECS: i64 = 60;

/// Closed occupancy interval for one super-category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub super_category: SuperCategory,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    fn open(super_category: SuperCategory, at: NaiveDateTime) -> Self {
        Self {
            super_category,
            start: at,
            end: at,
        }
    }
}

// Reported as a `[start, end]` pair; the category is the report key.
impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (format_timestamp(&self.start), format_timestamp(&self.end)).serialize(serializer)
    }
}

/// Collapse timestamps into maximal periods whose consecutive gaps stay under
/// [`PERIOD_GAP_SECS`].
pub fn merge_periods(
    super_category: SuperCategory,
    mut timestamps: Vec<NaiveDateTime>,
) -> Vec<Period> {
    if timestamps.is_empty() {
        return Vec::new();
    }

    // No-op for feeds read back in time order
    timestamps.sort_unstable();

    let gap = Duration::seconds(PERIOD_GAP_SECS);
    let mut periods = Vec::new();
    let mut current: Option<Period> = None;

    for timestamp in timestamps {
        match &mut current {
            Some(period) if timestamp - period.end < gap => {
                period.end = timestamp;
            }
            _ => {
                if let Some(period) = current.take() {
                    periods.push(period);
                }
                current = Some(Period::open(super_category, timestamp));
            }
        }
    }

    if let Some(period) = current {
        periods.push(period);
    }

    periods
}
