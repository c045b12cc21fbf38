pub mod alerts;
pub mod category;
pub mod detector;
pub mod event;

pub use alerts::{AlertSink, LogAlertSink};
pub use category::{classify, Category, SuperCategory};
pub use detector::{AlertDecision, RunDetector, RunState};
pub use event::{format_timestamp, parse_timestamp, Detection, TIMESTAMP_FORMAT};
