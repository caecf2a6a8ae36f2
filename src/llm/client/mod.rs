//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::types::Payload;

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LLMConfig {
        &self.config
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 Checking model connection...");
        match self
            .prompt("You are a helpful assistant.", "Hello", self.config.temperature)
            .await
        {
            Ok(_) => {
                println!("✅ Model connection OK");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ Model connection failed: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，每次尝试都受超时约束
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let mut retries = 0;

        loop {
            let outcome = match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "model call timed out after {}s",
                    self.config.timeout_seconds
                )),
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(
                        attempt = retries,
                        max_attempts = max_retries,
                        error = %err,
                        "model call failed"
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    /// 单轮对话，返回原始文本
    pub async fn prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<String> {
        let agent =
            self.client
                .create_agent(&self.config.model, system_prompt, temperature, &self.config);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    /// 单轮对话，要求模型返回JSON对象
    ///
    /// 解析失败也会触发重试。
    pub async fn prompt_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> Result<Payload> {
        let agent =
            self.client
                .create_agent(&self.config.model, system_prompt, temperature, &self.config);

        self.retry_with_backoff(|| async {
            let raw = agent.prompt(user_prompt).await?;
            utils::parse_json_object(&raw)
        })
        .await
    }
}
