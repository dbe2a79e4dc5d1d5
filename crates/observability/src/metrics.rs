//! 分发指标收集模块
//!
//! 收集 fan-out 分发层的运行指标。

use contracts::PipelineError;
use metrics::{counter, gauge};

/// 记录一次完整分发的批次
///
/// 每次 `dispatch` 正常返回时调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_batch_dispatched;
///
/// let placed = dispatcher.dispatch(&mut batch).await?;
/// record_batch_dispatched(placed);
/// ```
pub fn record_batch_dispatched(placed: usize) {
    counter!("fanout_batches_total").increment(1);
    counter!("fanout_records_total").increment(placed as u64);
}

/// 记录单条记录入队
pub fn record_record_placed(queue: usize) {
    counter!(
        "fanout_records_placed_total",
        "queue" => queue.to_string()
    )
    .increment(1);
}

/// 记录分发失败（取消或队列关闭）
///
/// 失败的 `dispatch` 调用上报已投递前缀与未投递余量。
pub fn record_dispatch_error(error: &PipelineError) {
    match error {
        PipelineError::DispatchInterrupted { placed, remaining } => {
            record_dispatch_interrupted(*placed, *remaining);
        }
        PipelineError::QueueClosed {
            queue,
            placed,
            remaining,
        } => {
            counter!(
                "fanout_queue_closed_total",
                "queue" => queue.to_string()
            )
            .increment(1);
            record_dispatch_interrupted(*placed, *remaining);
        }
        _ => {
            counter!("fanout_dispatch_errors_total").increment(1);
        }
    }
}

/// 记录一次被中断的分发
pub fn record_dispatch_interrupted(placed: usize, remaining: usize) {
    counter!("fanout_dispatch_interrupted_total").increment(1);
    counter!("fanout_records_total").increment(placed as u64);
    gauge!("fanout_records_undelivered_current").set(remaining as f64);
}

/// 记录队列深度
pub fn record_queue_depth(queue: usize, depth: usize) {
    gauge!(
        "fanout_queue_depth",
        "queue" => queue.to_string()
    )
    .set(depth as f64);
}
