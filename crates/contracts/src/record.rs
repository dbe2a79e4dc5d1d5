//! Record - Pipeline 数据单元
//!
//! 流经管道的原始记录结构。

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 记录元信息
///
/// 由上游生产者填写，用于排序与诊断。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// 记录序号 (生产顺序，单调递增)
    pub number: u64,

    /// 数据来源 (文件名、主题名等)
    pub source: String,

    /// 记录创建时间
    pub created_at: DateTime<Utc>,
}

/// 管道记录
///
/// 分发层将其视为不透明数据，逐字节转发，不读取、不修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 元信息
    pub header: RecordHeader,

    /// 数据载荷 (零拷贝)
    pub payload: Bytes,
}

impl Record {
    /// 创建记录，创建时间取当前时刻。
    pub fn new(number: u64, source: impl Into<String>, payload: Bytes) -> Self {
        Self {
            header: RecordHeader {
                number,
                source: source.into(),
                created_at: Utc::now(),
            },
            payload,
        }
    }
}
