use anyhow::{anyhow, Result};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::detection::AlertSink;
use crate::error::DetectionError;

use super::pipeline::{IngestPipeline, IngestReceipt};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const INGEST_QUEUE_DEPTH: usize = 64;

struct IngestRequest {
    timestamp: String,
    category: String,
    reply: oneshot::Sender<Result<IngestReceipt, DetectionError>>,
}

/// Cloneable producer side of the ingest worker. Every clone feeds the same
/// detector, one request at a time.
#[derive(Clone)]
pub struct IngestHandle {
    sender: mpsc::Sender<IngestRequest>,
}

impl IngestHandle {
    /// Submit a raw detection and wait for the worker's receipt. Parse and
    /// category errors come back as [`DetectionError`] inside the
    /// `anyhow::Error`.
    pub async fn submit(&self, timestamp: &str, category: &str) -> Result<IngestReceipt> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = IngestRequest {
            timestamp: timestamp.to_string(),
            category: category.to_string(),
            reply: reply_tx,
        };

        self.sender
            .send(request)
            .await
            .map_err(|_| anyhow!("ingest worker is no longer running"))?;

        let receipt = reply_rx
            .await
            .map_err(|_| anyhow!("ingest worker dropped request"))??;
        Ok(receipt)
    }
}

/// Spawn a task that exclusively owns `pipeline`. The task stops when the
/// token is cancelled or every handle is dropped, and hands the pipeline back
/// through its join handle.
pub fn spawn_ingest_worker<S>(
    pipeline: IngestPipeline<S>,
    cancel_token: CancellationToken,
) -> (IngestHandle, JoinHandle<IngestPipeline<S>>)
where
    S: AlertSink + 'static,
{
    let (sender, receiver) = mpsc::channel(INGEST_QUEUE_DEPTH);
    let task = tokio::spawn(ingest_loop(pipeline, receiver, cancel_token));
    (IngestHandle { sender }, task)
}

async fn ingest_loop<S: AlertSink>(
    mut pipeline: IngestPipeline<S>,
    mut receiver: mpsc::Receiver<IngestRequest>,
    cancel_token: CancellationToken,
) -> IngestPipeline<S> {
    loop {
        tokio::select! {
            request = receiver.recv() => {
                let Some(request) = request else {
                    log_info!("all ingest handles dropped; worker exiting");
                    break;
                };
                let result = pipeline.ingest(&request.timestamp, &request.category).await;
                if let Err(err) = &result {
                    log_warn!("rejected detection ({}, {}): {err}", request.timestamp, request.category);
                }
                let _ = request.reply.send(result);
            }
            _ = cancel_token.cancelled() => {
                log_info!("ingest worker shutting down");
                break;
            }
        }
    }

    pipeline
}
