//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Azure OpenAI / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockLlmClient;
pub use openai::{AzureDeployment, OpenAiClient, TokenUsage};
pub use traits::LlmClient;
