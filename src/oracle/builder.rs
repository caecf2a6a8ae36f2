use anyhow::Result;
use async_trait::async_trait;

use super::ContentGenerator;
use super::prompts::content_system_prompt;
use crate::catalog::ProductType;
use crate::llm::client::LLMClient;
use crate::types::Payload;

/// 产品内容生成Agent
pub struct BuilderAgent {
    llm_client: LLMClient,
}

impl BuilderAgent {
    pub fn new(llm_client: LLMClient) -> Self {
        Self { llm_client }
    }
}

#[async_trait]
impl ContentGenerator for BuilderAgent {
    async fn generate(&self, topic: &str, product_type: ProductType) -> Result<Payload> {
        println!("🔨 BuilderAgent: generating {}...", product_type);
        let system_prompt = content_system_prompt(product_type);
        let user_prompt = format!("Create {} for: {}", product_type.as_str().replace('_', " "), topic);

        self.llm_client
            .prompt_json(
                &system_prompt,
                &user_prompt,
                self.llm_client.config().content_temperature,
            )
            .await
    }
}
