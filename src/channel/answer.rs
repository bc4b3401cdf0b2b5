//! 最终回答合约：`{"contentType": ..., "content": ...}`
//!
//! 与配方抽取不同，这里不做任何容错：最终回答的格式由同一份 system prompt 约定，
//! 整段输出必须是严格 JSON（不允许 Markdown 包裹）。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentError;

/// 模型给出的结构化最终回答；contentType 保留原始字符串，由 ResponseRouter 判定是否合法
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAnswer {
    pub content_type: String,
    pub content: Value,
}

impl FinalAnswer {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content_type: "Text".to_string(),
            content: Value::String(content.into()),
        }
    }

    pub fn adaptive_card(card: Value) -> Self {
        Self {
            content_type: "AdaptiveCard".to_string(),
            content: card,
        }
    }

    /// 严格解析；任何偏差都是整轮失败
    pub fn parse(raw: &str) -> Result<Self, AgentError> {
        serde_json::from_str(raw.trim()).map_err(|e| AgentError::FinalAnswerParse(e.to_string()))
    }
}
