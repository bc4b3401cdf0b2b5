//! Planner：调用模型并区分"工具调用"与"最终回答"
//!
//! 工具调用是顶层带 `"tool"` 键的 JSON 对象：`{"tool": "RecipeQuery", "args": {...}}`。
//! 模型偶尔会在调用前后附带说明文字，所以工具调用的识别是宽松的（取第一个配平的对象）；
//! 其余输出一律视为最终回答，交给 FinalAnswer 严格解析。

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;

use crate::core::AgentError;
use crate::knowledge::extractor::first_balanced_object;
use crate::llm::LlmClient;
use crate::memory::Message;

/// 模型请求的一次工具调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerOutput {
    ToolCall(ToolCall),
    /// 原始输出文本，待严格解析
    Final(String),
}

/// 解析模型输出：顶层含非空 "tool" 字段的对象为 ToolCall，否则为 Final
pub fn parse_llm_output(output: &str) -> PlannerOutput {
    let trimmed = output.trim();
    let candidate = serde_json::from_str::<Value>(trimmed).ok().or_else(|| {
        first_balanced_object(trimmed).and_then(|span| serde_json::from_str(span).ok())
    });

    match candidate.as_ref().and_then(as_tool_call) {
        Some(tc) => PlannerOutput::ToolCall(tc),
        None => PlannerOutput::Final(trimmed.to_string()),
    }
}

fn as_tool_call(v: &Value) -> Option<ToolCall> {
    let obj = v.as_object()?;
    let tool = obj.get("tool")?.as_str()?.trim();
    if tool.is_empty() {
        return None;
    }
    Some(ToolCall {
        tool: tool.to_string(),
        args: obj.get("args").cloned().unwrap_or(Value::Null),
    })
}

/// 持有 LLM、system prompt 与单次调用超时
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    timeout: Duration,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 底层客户端的累计 token 使用：(prompt, completion, total)
    pub fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    /// system prompt + 历史消息 -> 模型输出文本
    pub async fn plan(&self, messages: &[Message]) -> Result<String, AgentError> {
        let mut full = Vec::with_capacity(messages.len() + 1);
        full.push(Message::system(self.system_prompt.clone()));
        full.extend_from_slice(messages);

        timeout(self.timeout, self.llm.complete(&full))
            .await
            .map_err(|_| AgentError::LlmTimeout(self.timeout.as_secs()))?
            .map_err(AgentError::LlmError)
    }
}
