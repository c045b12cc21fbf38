use chrono::NaiveDateTime;
use log::info;

use crate::detection::event::format_timestamp;

/// Receives every alert raised by the run detector.
pub trait AlertSink: Send {
    fn notify(&mut self, run_start: NaiveDateTime, run_end: NaiveDateTime);
}

/// Writes alerts to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&mut self, run_start: NaiveDateTime, run_end: NaiveDateTime) {
        info!("{}", alert_message(&run_start, &run_end));
    }
}

pub fn alert_message(run_start: &NaiveDateTime, run_end: &NaiveDateTime) -> String {
    format!(
        "A person is detected in >=5 consecutive intervals, from {} to {}",
        format_timestamp(run_start),
        format_timestamp(run_end)
    )
}
