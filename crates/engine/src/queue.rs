// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool over one FIFO submission channel

use crate::job::{JobError, ProcessJob};
use std::sync::Arc;
use tess_core::{JobOutcome, PackRequest};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const DEFAULT_WORKERS: usize = 2;

/// Errors from queue submission
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is stopped")]
    Closed,
}

type JobResult = Result<JobOutcome, JobError>;

// None is the poison value; one per worker drains the pool.
type Envelope = Option<(PackRequest, oneshot::Sender<JobResult>)>;

/// `workers` cooperative consumers share an unbounded FIFO channel of
/// `(request, promise)` pairs. Submissions are picked up in order; each
/// worker runs at most one job at a time.
pub struct JobQueue<P> {
    processor: Arc<P>,
    workers: usize,
    tx: mpsc::UnboundedSender<Envelope>,
    rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Envelope>>>,
    handles: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl<P: ProcessJob> JobQueue<P> {
    pub fn new(processor: P, workers: Option<usize>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            processor: Arc::new(processor),
            workers: workers.unwrap_or(DEFAULT_WORKERS).max(1),
            tx,
            rx: Arc::new(tokio::sync::Mutex::new(rx)),
            handles: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Spawn the workers. Idempotent while they are running.
    pub fn start(&self) {
        let mut handles = self.handles.lock();
        if !handles.is_empty() {
            return;
        }
        for worker in 0..self.workers {
            let processor = Arc::clone(&self.processor);
            let rx = Arc::clone(&self.rx);
            handles.push(tokio::spawn(async move {
                loop {
                    let envelope = { rx.lock().await.recv().await };
                    match envelope {
                        // Poison or channel teardown: drain and exit.
                        None | Some(None) => break,
                        Some(Some((request, reply))) => {
                            tracing::debug!(worker, user_id = request.user_id, "job picked up");
                            let result = processor.process(request).await;
                            // The submitter may have dropped its future.
                            let _ = reply.send(result);
                        }
                    }
                }
                tracing::debug!(worker, "worker drained");
            }));
        }
    }

    /// Enqueue a request; the returned future resolves with the worker's
    /// outcome or failure.
    pub fn submit(&self, request: PackRequest) -> Result<oneshot::Receiver<JobResult>, QueueError> {
        let (reply, future) = oneshot::channel();
        self.tx.send(Some((request, reply))).map_err(|_| QueueError::Closed)?;
        Ok(future)
    }

    /// Send one poison per worker and wait for all of them to drain
    /// in-flight jobs. Idempotent.
    pub async fn stop(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() {
            return;
        }
        for _ in 0..self.workers {
            let _ = self.tx.send(None);
        }
        for handle in handles {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
