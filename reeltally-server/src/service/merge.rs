//! Single-consumer merge funnel
//!
//! Every concurrent producer hands completed batches over a bounded channel
//! to one consumer task, which is the sole code appending to the
//! accumulator. Producers block in [`BatchSink::send`] until the consumer
//! has absorbed their batch, so each producer has at most one handoff in
//! flight. The funnel is created per operation and torn down with it: drop
//! all sinks to drain, then [`Collector::finish`] joins the consumer.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// The collector stopped receiving (operation tearing down)
#[derive(Debug, Error)]
#[error("merge collector closed")]
pub struct SinkClosed;

/// Sending half of the funnel; clone one per producer
#[derive(Debug)]
pub struct BatchSink<T> {
    tx: mpsc::Sender<Vec<T>>,
}

// Manual impl: the derive would bound T: Clone, which senders do not need
impl<T> Clone for BatchSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> BatchSink<T> {
    /// Hand a completed batch to the consumer, waiting until it is absorbed
    pub async fn send(&self, batch: Vec<T>) -> Result<(), SinkClosed> {
        self.tx.send(batch).await.map_err(|_| SinkClosed)
    }
}

/// Receiving half of the funnel; owns the consumer task
#[derive(Debug)]
pub struct Collector<T> {
    handle: JoinHandle<Vec<T>>,
}

impl<T> Collector<T> {
    /// Join the consumer and take everything it accumulated
    ///
    /// All sinks must be dropped first or this waits forever.
    pub async fn finish(self) -> Result<Vec<T>, JoinError> {
        self.handle.await
    }
}

/// Create a connected sink/collector pair with the consumer already running
pub fn funnel<T: Send + 'static>() -> (BatchSink<T>, Collector<T>) {
    let (tx, mut rx) = mpsc::channel::<Vec<T>>(1);
    let handle = tokio::spawn(async move {
        let mut items = Vec::new();
        while let Some(batch) = rx.recv().await {
            items.extend(batch);
        }
        items
    });
    (BatchSink { tx }, Collector { handle })
}
