//! # Dispatcher
//!
//! 记录分发模块。
//!
//! 负责：
//! - 消费上游产生的 `Batch`
//! - 按严格轮询顺序写入 N 个有界队列
//! - 队列满时阻塞等待（背压），阻塞可被取消信号中止

pub mod dispatcher;
pub mod error;
pub mod metrics;

pub use contracts::{Batch, FanoutConfig, Record, RecordWriter};
pub use dispatcher::{create_dispatcher, RoundRobinDispatcher};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
