use anyhow::Result;
use async_trait::async_trait;

use super::ResearchOracle;
use super::prompts::{RESEARCH_SYSTEM_PROMPT, SCORE_SYSTEM_PROMPT};
use crate::llm::client::LLMClient;
use crate::llm::client::utils::parse_score;

/// 市场调研Agent
pub struct AnalystAgent {
    llm_client: LLMClient,
}

impl AnalystAgent {
    pub fn new(llm_client: LLMClient) -> Self {
        Self { llm_client }
    }
}

#[async_trait]
impl ResearchOracle for AnalystAgent {
    async fn research(&self, topic: &str) -> Result<String> {
        println!("🕵️ AnalystAgent: researching '{}'...", topic);
        let user_prompt = format!("Research Indonesian market potential for: {}", topic);
        let report = self
            .llm_client
            .prompt(
                RESEARCH_SYSTEM_PROMPT,
                &user_prompt,
                self.llm_client.config().research_temperature,
            )
            .await?;
        println!("✅ AnalystAgent: research complete");
        Ok(report)
    }

    async fn score(&self, report: &str) -> Result<Option<u8>> {
        println!("⚖️ AnalystAgent: scoring business idea...");
        let reply = self
            .llm_client
            .prompt(
                SCORE_SYSTEM_PROMPT,
                report,
                self.llm_client.config().temperature,
            )
            .await?;

        let score = parse_score(&reply);
        if score.is_none() {
            tracing::debug!(reply = %reply.trim(), "unparsable score reply");
        }
        Ok(score)
    }
}
