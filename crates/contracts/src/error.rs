//! Layered error definitions
//!
//! Categorized by source: config / dispatch / queue

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Dispatch Errors =====
    /// A blocking put was cancelled mid-batch. The batch retains the
    /// records that were not delivered.
    #[error("dispatch interrupted: {placed} record(s) placed, {remaining} not delivered")]
    DispatchInterrupted { placed: usize, remaining: usize },

    // ===== Queue Errors =====
    /// A queue's consumer dropped its receiving end mid-run
    #[error("queue {queue} closed: {placed} record(s) placed, {remaining} not delivered")]
    QueueClosed {
        queue: usize,
        placed: usize,
        remaining: usize,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create dispatch interruption error
    pub fn dispatch_interrupted(placed: usize, remaining: usize) -> Self {
        Self::DispatchInterrupted { placed, remaining }
    }
}
