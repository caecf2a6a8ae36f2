use anyhow::Result;

use crate::config::Config;
use crate::llm::client::LLMClient;
use crate::oracle::{AnalystAgent, BuilderAgent, ContentGenerator, ResearchOracle};
use crate::render::{ArtifactRenderer, Renderer};
use crate::store::{JsonFileStore, RecordStore};
use crate::types::{Product, Signal};

/// 工作台：持有存储、外部能力与配置，核心流程都挂在它上面
pub struct Workshop {
    /// 配置
    pub config: Config,
    /// 信号集合
    pub signals: Box<dyn RecordStore<Signal>>,
    /// 产品集合
    pub products: Box<dyn RecordStore<Product>>,
    /// 调研与评分
    pub research: Box<dyn ResearchOracle>,
    /// 内容生成
    pub generator: Box<dyn ContentGenerator>,
    /// 产物渲染
    pub renderer: Box<dyn Renderer>,
}

impl Workshop {
    /// 基于配置创建：JSON文件存储 + LLM Agent + 默认渲染器
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        Ok(Self::with_llm(config, llm_client))
    }

    /// 使用已建立（通常已检查过连接）的LLM客户端创建
    pub fn with_llm(config: Config, llm_client: LLMClient) -> Self {
        Self {
            signals: Box::new(JsonFileStore::new(config.signals_path())),
            products: Box::new(JsonFileStore::new(config.products_path())),
            research: Box::new(AnalystAgent::new(llm_client.clone())),
            generator: Box::new(BuilderAgent::new(llm_client)),
            renderer: Box::new(ArtifactRenderer::from_config(&config)),
            config,
        }
    }
}
