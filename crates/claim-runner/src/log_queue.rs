//! Ordered output queue
//!
//! All user-facing lines go through one bounded channel drained by a single
//! consumer task, so lines from different producers never interleave inside
//! a line and are written in exactly the order they were enqueued.
//! Producers wait when the queue is full.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pending lines the queue holds before producers wait.
pub const LOG_QUEUE_CAPACITY: usize = 1000;

/// Destination for queued lines. Only the consumer task calls it.
pub trait LogSink: Send + 'static {
    fn write_line(&mut self, line: &str);
}

/// Writes each line as an `info` event on the `dip_claimer::output` target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&mut self, line: &str) {
        info!(target: "dip_claimer::output", "{line}");
    }
}

/// Cloneable producer handle for the output queue.
#[derive(Debug, Clone)]
pub struct LogQueue {
    tx: mpsc::Sender<String>,
}

impl LogQueue {
    /// Start the consumer task writing into `sink`.
    ///
    /// The task ends once every `LogQueue` clone has been dropped and the
    /// backlog is written; await the handle to flush on shutdown.
    pub fn spawn<S: LogSink>(capacity: usize, mut sink: S) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<String>(capacity);
        let handle = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                sink.write_line(&line);
            }
        });
        (Self { tx }, handle)
    }

    /// Enqueue one line, waiting for space if the queue is full.
    pub async fn push(&self, line: impl Into<String>) {
        if self.tx.send(line.into()).await.is_err() {
            warn!("output consumer has stopped, dropping line");
        }
    }
}
