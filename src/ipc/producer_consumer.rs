/*!
 * Producer/Consumer Demonstration
 * Two tokio tasks exchanging integers through a bounded buffer
 *
 * The flows finish together: if either fails or is cancelled it cancels
 * the other before returning.
 */

use super::buffer::BoundedBuffer;
use super::cancel::CancelToken;
use crate::core::errors::{BufferError, BufferResult};
use crate::core::limits::{CONSUMER_PACING, DEFAULT_BUFFER_CAPACITY, DEFAULT_DEMO_ITEMS, PRODUCER_PACING};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Outcome of one producer/consumer run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub capacity: usize,
    pub produced: Vec<u64>,
    pub consumed: Vec<u64>,
    /// Largest buffer length seen right after a produce
    pub max_observed_len: usize,
    pub cancelled: bool,
}

impl DemoReport {
    /// Every produced item was consumed, in order
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.produced == self.consumed
    }
}

struct FlowOutcome {
    items: Vec<u64>,
    max_len: usize,
    error: Option<BufferError>,
}

/// Producer/consumer pair over one bounded buffer
#[derive(Debug, Clone)]
pub struct ProducerConsumer {
    buffer: Arc<BoundedBuffer<u64>>,
    items: usize,
    producer_pacing: Duration,
    consumer_pacing: Duration,
    cancel: CancelToken,
}

impl ProducerConsumer {
    pub fn new(capacity: usize, items: usize) -> Self {
        Self {
            buffer: Arc::new(BoundedBuffer::new(capacity)),
            items,
            producer_pacing: PRODUCER_PACING,
            consumer_pacing: CONSUMER_PACING,
            cancel: CancelToken::new(),
        }
    }

    /// Delay after each produce and each consume
    pub fn with_pacing(mut self, producer: Duration, consumer: Duration) -> Self {
        self.producer_pacing = producer;
        self.consumer_pacing = consumer;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn buffer(&self) -> Arc<BoundedBuffer<u64>> {
        Arc::clone(&self.buffer)
    }

    /// Run both flows to completion or cancellation
    ///
    /// Cancellation is reported in the result rather than as an error.
    pub async fn run(self) -> BufferResult<DemoReport> {
        info!(
            capacity = self.buffer.capacity(),
            items = self.items,
            "Starting producer/consumer"
        );

        let producer = self.spawn_producer();
        let consumer = self.spawn_consumer();
        let (producer, consumer) = tokio::join!(producer, consumer);
        let producer = joined(producer, &self.cancel)?;
        let consumer = joined(consumer, &self.cancel)?;

        for error in [&producer.error, &consumer.error].into_iter().flatten() {
            if *error != BufferError::Cancelled {
                return Err(error.clone());
            }
        }

        let report = DemoReport {
            capacity: self.buffer.capacity(),
            produced: producer.items,
            consumed: consumer.items,
            max_observed_len: producer.max_len,
            cancelled: self.cancel.is_cancelled(),
        };
        info!(
            produced = report.produced.len(),
            consumed = report.consumed.len(),
            cancelled = report.cancelled,
            "Producer/consumer finished"
        );
        Ok(report)
    }

    fn spawn_producer(&self) -> JoinHandle<FlowOutcome> {
        let buffer = Arc::clone(&self.buffer);
        let cancel = self.cancel.clone();
        let items = self.items as u64;
        let pacing = self.producer_pacing;

        tokio::spawn(async move {
            let mut outcome = FlowOutcome {
                items: Vec::new(),
                max_len: 0,
                error: None,
            };
            for item in 1..=items {
                let step = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(BufferError::Cancelled),
                    result = buffer.produce(item) => result,
                };
                if let Err(err) = step {
                    outcome.error = Some(err);
                    break;
                }
                outcome.items.push(item);
                outcome.max_len = outcome.max_len.max(buffer.len());
                info!(item, len = buffer.len(), "Produced");

                if pause(&cancel, pacing).await.is_err() {
                    outcome.error = Some(BufferError::Cancelled);
                    break;
                }
            }
            if outcome.error.is_some() {
                cancel.cancel();
            }
            outcome
        })
    }

    fn spawn_consumer(&self) -> JoinHandle<FlowOutcome> {
        let buffer = Arc::clone(&self.buffer);
        let cancel = self.cancel.clone();
        let items = self.items;
        let pacing = self.consumer_pacing;

        tokio::spawn(async move {
            let mut outcome = FlowOutcome {
                items: Vec::with_capacity(items),
                max_len: 0,
                error: None,
            };
            for _ in 0..items {
                let step = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(BufferError::Cancelled),
                    result = buffer.consume() => result,
                };
                match step {
                    Ok(item) => {
                        outcome.items.push(item);
                        info!(item, len = buffer.len(), "Consumed");
                    }
                    Err(err) => {
                        outcome.error = Some(err);
                        break;
                    }
                }

                if pause(&cancel, pacing).await.is_err() {
                    outcome.error = Some(BufferError::Cancelled);
                    break;
                }
            }
            if outcome.error.is_some() {
                cancel.cancel();
            }
            outcome
        })
    }
}

impl Default for ProducerConsumer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY, DEFAULT_DEMO_ITEMS)
    }
}

/// Sleep for `pacing` unless cancelled first
async fn pause(cancel: &CancelToken, pacing: Duration) -> BufferResult<()> {
    if pacing.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BufferError::Cancelled),
        _ = tokio::time::sleep(pacing) => Ok(()),
    }
}

fn joined(
    result: Result<FlowOutcome, tokio::task::JoinError>,
    cancel: &CancelToken,
) -> BufferResult<FlowOutcome> {
    result.map_err(|err| {
        warn!(%err, "Flow task failed");
        cancel.cancel();
        BufferError::TaskFailed(err.to_string())
    })
}
