//! LLM 客户端抽象
//!
//! 模型推理服务对编排器来说是不透明能力：给定消息序列，返回一段文本。
//! Orchestrator 与 RecipeExtractor 共享同一个 `Arc<dyn LlmClient>`。

use async_trait::async_trait;

use crate::memory::Message;

/// LLM 客户端 trait：非流式完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 发送完整消息序列，返回模型输出文本
    async fn complete(&self, messages: &[Message]) -> Result<String, String>;

    /// 累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
