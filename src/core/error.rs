//! 错误类型
//!
//! - `ToolError`：单次工具调用内的错误，转成 `{"error": ...}` 回灌给模型，不中断本轮。
//! - `AgentError`：整轮失败（模型不可用、最终回答不合约、路由失败、步数超限），
//!   用户只看到通用提示。

use serde_json::{json, Value};
use thiserror::Error;

use crate::channel::RoutingError;
use crate::knowledge::{ExtractionError, StoreError};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArgs { tool: String, reason: String },

    #[error("Tool timeout: {0}")]
    Timeout(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ToolError {
    /// 回灌给模型的结构化错误
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("LLM timeout after {0}s")]
    LlmTimeout(u64),

    #[error("Final answer is not valid JSON: {0}")]
    FinalAnswerParse(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Tool loop exceeded {0} steps without a final answer")]
    LoopExceeded(usize),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// 对用户可见的通用提示（不暴露内部错误细节）
    pub fn user_notice(&self) -> &'static str {
        match self {
            AgentError::LlmTimeout(_) => {
                "Sorry, I took too long to think about that. Please try again."
            }
            AgentError::LoopExceeded(_) => {
                "Sorry, I couldn't finish working on that request. Could you rephrase it?"
            }
            _ => "Sorry, something went wrong while preparing my answer. Please try again.",
        }
    }
}
