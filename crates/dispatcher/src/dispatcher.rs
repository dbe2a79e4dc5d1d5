//! Round-robin fan-out into bounded queues

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use contracts::{Batch, FanoutConfig, PipelineError, RecordWriter};

use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;

/// Dispatcher that writes records to a set of bounded queues in strict
/// round-robin order.
///
/// The dispatcher holds the sender half of each queue; the receiver halves
/// are owned by external consumers. A full queue suspends `dispatch` until a
/// consumer frees capacity, or until the cancellation token fires.
///
/// Record `i` (counted across the dispatcher's whole lifetime, not per call)
/// lands in `queues[i % N]`; batch boundaries do not reset the rotation.
///
/// # Concurrency
///
/// One instance is driven by exactly one producer at a time: `dispatch`
/// takes `&mut self`, so producers sharing an instance must serialize calls
/// through their own synchronization (e.g. `tokio::sync::Mutex`). The
/// rotation cursor is plain state, not an atomic.
#[derive(Debug)]
pub struct RoundRobinDispatcher<R> {
    /// Sender handles of the target queues
    queues: Vec<mpsc::Sender<R>>,
    /// Queue receiving the next record, always in `0..queues.len()`
    next_queue: usize,
    /// Signal that aborts a blocked put (shutdown, caller-side timeout)
    cancel: CancellationToken,
    /// Shared metrics
    metrics: Arc<DispatchMetrics>,
}

impl<R> RoundRobinDispatcher<R> {
    /// Create a dispatcher over the given queues.
    ///
    /// The queue set is fixed for the dispatcher's lifetime and must not be
    /// empty. The dispatcher starts with a token that never fires; use
    /// [`with_cancellation`](Self::with_cancellation) to wire a shutdown
    /// signal.
    pub fn new(queues: Vec<mpsc::Sender<R>>) -> Result<Self, DispatcherError> {
        Self::with_cancellation(queues, CancellationToken::new())
    }

    /// Create a dispatcher whose blocked puts abort when `cancel` fires.
    ///
    /// Timeout policy belongs to the caller: cancel the token from a
    /// shutdown path or a deadline task. The dispatcher hardcodes no
    /// timeouts of its own.
    pub fn with_cancellation(
        queues: Vec<mpsc::Sender<R>>,
        cancel: CancellationToken,
    ) -> Result<Self, DispatcherError> {
        if queues.is_empty() {
            return Err(DispatcherError::configuration(
                "at least one queue is required",
            ));
        }
        let metrics = Arc::new(DispatchMetrics::new(queues.len()));
        Ok(Self {
            queues,
            next_queue: 0,
            cancel,
            metrics,
        })
    }

    /// Number of queues this dispatcher rotates over
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Replace the cancellation signal.
    ///
    /// A fired token stays fired, so a caller that cancelled a dispatch and
    /// wants to retry the remainder installs a fresh token first. The
    /// rotation cursor is untouched.
    pub fn set_cancellation(&mut self, cancel: CancellationToken) {
        self.cancel = cancel;
    }

    /// Lifecycle hook, reserved for future resource acquisition.
    pub fn open(&mut self) -> Result<(), DispatcherError> {
        Ok(())
    }

    /// Lifecycle hook, reserved for future teardown.
    ///
    /// Does not close or drain the queues; they outlive the dispatcher and
    /// are closed by their owning side.
    pub fn close(&mut self) -> Result<(), DispatcherError> {
        Ok(())
    }

    /// Write every record of the batch to the queues in round-robin order.
    ///
    /// Records are drained from the front of the batch one at a time: the
    /// target queue is `queues[cursor]`, the put blocks while that queue is
    /// full, and the cursor advances only after the record is actually
    /// placed. On success all records have been placed and `Ok(placed)` is
    /// returned; an empty batch returns `Ok(0)` immediately.
    ///
    /// # Errors
    ///
    /// [`DispatcherError::Interrupted`] if the cancellation token fired
    /// while a put was blocked, [`DispatcherError::QueueClosed`] if a
    /// consumer dropped its receiver. Either way the error carries the
    /// placed/remaining counts, the batch retains exactly the undelivered
    /// records, and the cursor still points at the queue whose turn was
    /// missed, so a retry continues the same rotation.
    #[instrument(name = "dispatch_batch", skip(self, batch), fields(batch_len = batch.len()))]
    pub async fn dispatch(&mut self, batch: &mut Batch<R>) -> Result<usize, DispatcherError> {
        let mut placed = 0usize;

        while !batch.is_empty() {
            let target = self.next_queue;

            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.metrics.inc_interrupted_count();
                    return Err(DispatcherError::Interrupted {
                        placed,
                        remaining: batch.len(),
                    });
                }
                permit = self.queues[target].reserve() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        self.metrics.inc_interrupted_count();
                        return Err(DispatcherError::QueueClosed {
                            queue: target,
                            placed,
                            remaining: batch.len(),
                        });
                    }
                },
            };

            let Some(record) = batch.pop_front() else {
                break;
            };
            permit.send(record);

            // The put has succeeded; only now does the rotation move on, so
            // an aborted wait never skips a queue's turn.
            self.next_queue = (self.next_queue + 1) % self.queues.len();
            placed += 1;
            self.metrics.inc_enqueued(target);
        }

        if placed > 0 {
            self.metrics.inc_batch_count();
            debug!(placed, next_queue = self.next_queue, "batch dispatched");
        }

        Ok(placed)
    }
}

impl<R: Send> RecordWriter<R> for RoundRobinDispatcher<R> {
    async fn open(&mut self) -> Result<(), PipelineError> {
        RoundRobinDispatcher::open(self).map_err(PipelineError::from)
    }

    async fn write(&mut self, batch: &mut Batch<R>) -> Result<usize, PipelineError> {
        self.dispatch(batch).await.map_err(PipelineError::from)
    }

    async fn close(&mut self) -> Result<(), PipelineError> {
        RoundRobinDispatcher::close(self).map_err(PipelineError::from)
    }
}

/// Convenience function to build a dispatcher and its queues from a config
///
/// Validates the config, creates `queue_count` bounded channels, and returns
/// the dispatcher together with the receiver halves for the surrounding
/// pipeline to hand to its consumers. The dispatcher never owns a receiver.
#[instrument(name = "dispatcher_create", skip(cancel))]
pub fn create_dispatcher<R>(
    config: &FanoutConfig,
    cancel: CancellationToken,
) -> Result<(RoundRobinDispatcher<R>, Vec<mpsc::Receiver<R>>), DispatcherError> {
    config.validate()?;

    let mut senders = Vec::with_capacity(config.queue_count);
    let mut receivers = Vec::with_capacity(config.queue_count);
    for _ in 0..config.queue_count {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        senders.push(tx);
        receivers.push(rx);
    }

    let dispatcher = RoundRobinDispatcher::with_cancellation(senders, cancel)?;
    Ok((dispatcher, receivers))
}
