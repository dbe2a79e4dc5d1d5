//! Dispatcher error types

use thiserror::Error;

use contracts::PipelineError;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Invalid queue set at construction
    #[error("dispatcher configuration error: {message}")]
    Configuration { message: String },

    /// A blocking put was cancelled mid-batch. The caller's batch retains
    /// the undelivered remainder.
    #[error("dispatch interrupted: {placed} record(s) placed, {remaining} not delivered")]
    Interrupted { placed: usize, remaining: usize },

    /// A queue's consumer dropped its receiving end
    #[error("queue {queue} closed by its consumer: {placed} record(s) placed, {remaining} not delivered")]
    QueueClosed {
        queue: usize,
        placed: usize,
        remaining: usize,
    },

    /// Contract-level error
    #[error("contract error: {0}")]
    Contract(#[from] PipelineError),
}

impl DispatcherError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Records placed before the call failed, if this is a delivery error
    pub fn placed(&self) -> Option<usize> {
        match self {
            Self::Interrupted { placed, .. } | Self::QueueClosed { placed, .. } => Some(*placed),
            _ => None,
        }
    }
}

impl From<DispatcherError> for PipelineError {
    fn from(err: DispatcherError) -> Self {
        match err {
            DispatcherError::Configuration { message } => {
                PipelineError::config_validation("queues", message)
            }
            DispatcherError::Interrupted { placed, remaining } => {
                PipelineError::DispatchInterrupted { placed, remaining }
            }
            DispatcherError::QueueClosed {
                queue,
                placed,
                remaining,
            } => PipelineError::QueueClosed {
                queue,
                placed,
                remaining,
            },
            DispatcherError::Contract(e) => e,
        }
    }
}
