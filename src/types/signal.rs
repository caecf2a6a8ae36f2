use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::error::{AutopreneurError, CoreResult};

/// 信号状态
///
/// 合法迁移：
/// - `new -> generating`：开始组装产品前获取
/// - `generating -> generated`：产品记录落盘后
/// - `generating -> failed`：组装中途放弃
/// - `failed -> new`：人工重置
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    #[default]
    New,
    Generating,
    Generated,
    Failed,
}

impl SignalStatus {
    pub fn can_transition_to(self, next: SignalStatus) -> bool {
        matches!(
            (self, next),
            (SignalStatus::New, SignalStatus::Generating)
                | (SignalStatus::Generating, SignalStatus::Generated)
                | (SignalStatus::Generating, SignalStatus::Failed)
                | (SignalStatus::Failed, SignalStatus::New)
        )
    }
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalStatus::New => write!(f, "new"),
            SignalStatus::Generating => write!(f, "generating"),
            SignalStatus::Generated => write!(f, "generated"),
            SignalStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 经过调研与评分的市场信号
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Signal {
    pub id: String,
    pub topic: String,
    /// 0..=100，读取旧数据时越界值会被截断到该区间
    #[serde(deserialize_with = "clamped_score")]
    pub score: u8,
    pub status: SignalStatus,
    pub report_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

impl Signal {
    /// 生成新的信号ID（UUID v4 前8位）
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    pub fn is_new(&self) -> bool {
        self.status == SignalStatus::New
    }

    /// 执行一次状态迁移，非法迁移不会修改状态
    pub fn transition(&mut self, next: SignalStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AutopreneurError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
