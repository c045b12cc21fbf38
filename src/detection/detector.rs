use chrono::{Duration, NaiveDateTime};

use crate::detection::category::{Category, SuperCategory};
use crate::detection::event::{format_timestamp, parse_timestamp};
use crate::error::Result;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Largest gap between two people detections that still continues a run.
pub const RUN_GAP_SECS: i64 = 30;
/// Run length at which the detector starts alerting.
pub const ALERT_RUN_LENGTH: u32 = 5;

/// Current people run tracked by a [`RunDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub run_start: NaiveDateTime,
    pub run_last: NaiveDateTime,
    pub run_length: u32,
}

impl Default for RunState {
    fn default() -> Self {
        // NaiveDateTime defaults to 1970-01-01T00:00:00
        Self {
            run_start: NaiveDateTime::default(),
            run_last: NaiveDateTime::default(),
            run_length: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    None,
    Alert {
        run_start: NaiveDateTime,
        run_end: NaiveDateTime,
    },
}

impl AlertDecision {
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertDecision::Alert { .. })
    }
}

/// Online detector for sustained people presence.
///
/// Owns its [`RunState`] exclusively; callers that feed it from several
/// producers must serialize access (see `ingest::worker`).
#[derive(Debug, Default)]
pub struct RunDetector {
    state: RunState,
}

impl RunDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn observe(&mut self, timestamp: NaiveDateTime, category: Category) -> AlertDecision {
        // Vehicles neither extend nor break a people run
        if category.super_category() != SuperCategory::People {
            return AlertDecision::None;
        }

        let state = &mut self.state;
        // The epoch sentinel is not an observed event, so the first people
        // detection always opens a run whatever its date
        let first = state.run_length == 0;
        if !first {
            if timestamp == state.run_last {
                return AlertDecision::None;
            }
            if timestamp < state.run_last {
                log_warn!(
                    "ignoring out-of-order {} detection at {} (last seen {})",
                    category,
                    format_timestamp(&timestamp),
                    format_timestamp(&state.run_last)
                );
                return AlertDecision::None;
            }
        }

        if first || timestamp - state.run_last > Duration::seconds(RUN_GAP_SECS) {
            state.run_start = timestamp;
            state.run_length = 1;
        } else {
            state.run_length += 1;
        }
        state.run_last = timestamp;

        if state.run_length >= ALERT_RUN_LENGTH {
            AlertDecision::Alert {
                run_start: state.run_start,
                run_end: state.run_last,
            }
        } else {
            AlertDecision::None
        }
    }

    /// String-input form of [`observe`](Self::observe). Malformed input is
    /// rejected before the run state is touched.
    pub fn observe_raw(&mut self, timestamp: &str, category: &str) -> Result<AlertDecision> {
        let timestamp = parse_timestamp(timestamp)?;
        let category: Category = category.parse()?;
        Ok(self.observe(timestamp, category))
    }
}
