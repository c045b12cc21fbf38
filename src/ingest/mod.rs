pub mod pipeline;
pub mod worker;

pub use pipeline::{IngestPipeline, IngestReceipt};
pub use worker::{spawn_ingest_worker, IngestHandle};
