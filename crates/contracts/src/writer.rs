//! RecordWriter trait - pipeline output interface
//!
//! Defines the abstract interface for record writers.

use crate::{Batch, PipelineError};

/// Record output trait
///
/// All writer implementations must implement this trait. `write` drains the
/// batch front-to-back as records are delivered; on failure the batch holds
/// the undelivered remainder.
#[trait_variant::make(RecordWriter: Send)]
pub trait LocalRecordWriter<R> {
    /// Acquire writer resources before the first write
    async fn open(&mut self) -> Result<(), PipelineError>;

    /// Write a batch of records, returning how many were placed
    ///
    /// # Errors
    /// Returns delivery error (should include how many records were placed)
    async fn write(&mut self, batch: &mut Batch<R>) -> Result<usize, PipelineError>;

    /// Release writer resources
    async fn close(&mut self) -> Result<(), PipelineError>;
}
