//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Ordering Model
//! - `Record`s flow through the pipeline in production order
//! - `RecordHeader::number` is the producer-assigned sequence number, used for
//!   ordering/diagnostics; the dispatcher itself never inspects it

mod batch;
mod config;
mod error;
mod record;
mod writer;

pub use batch::Batch;
pub use config::*;
pub use error::*;
pub use record::*;
pub use writer::{LocalRecordWriter, RecordWriter};
