//! 外部能力（调研、评分、内容生成）的抽象接口

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::ProductType;
use crate::types::Payload;

pub mod analyst;
pub mod builder;
mod prompts;

pub use analyst::AnalystAgent;
pub use builder::BuilderAgent;

/// 调研与评分
#[async_trait]
pub trait ResearchOracle: Send + Sync {
    /// 针对主题产出调研报告正文
    async fn research(&self, topic: &str) -> Result<String>;

    /// 根据报告打分；`Ok(None)` 表示回复无法解析为 0..=100 的整数
    async fn score(&self, report: &str) -> Result<Option<u8>>;
}

/// 按产品类型生成内容payload
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, topic: &str, product_type: ProductType) -> Result<Payload>;
}
