//! FanoutConfig - dispatcher assembly configuration
//!
//! Supplied by the surrounding pipeline at construction time; this layer
//! reads no configuration files itself.

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Default per-queue capacity
fn default_queue_capacity() -> usize {
    64
}

/// Fan-out queue set configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Number of queues (one per downstream consumer)
    pub queue_count: usize,

    /// Bounded capacity of each queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl FanoutConfig {
    /// Validate the configuration
    ///
    /// Returns the first error encountered, or Ok(()).
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.queue_count == 0 {
            return Err(PipelineError::config_validation(
                "queue_count",
                "at least one queue is required",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(PipelineError::config_validation(
                "queue_capacity",
                "queue capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            queue_count: 4,
            queue_capacity: default_queue_capacity(),
        }
    }
}
