//! 模型输出格式的 JSON Schema（schemars 生成），注入 system prompt，减少格式错误

use schemars::{schema_for, JsonSchema};
use serde_json::{Map, Value};

/// 工具调用请求：`{"tool": "...", "args": {...}}`（仅用于 Schema 生成）
#[allow(dead_code)]
#[derive(JsonSchema)]
struct ToolCallFormat {
    /// 工具名，如 RecipeQuery、AddRecipe、CurrentDateTime
    tool: String,
    /// 工具参数，结构见各工具的 parameters
    args: Map<String, Value>,
}

/// 结束本轮的最终回答（仅用于 Schema 生成）
#[allow(dead_code)]
#[derive(JsonSchema)]
#[serde(rename_all = "camelCase")]
struct FinalAnswerFormat {
    /// "Text" 或 "AdaptiveCard"
    content_type: String,
    /// Text 时为纯文本字符串；AdaptiveCard 时为卡片 JSON 对象
    content: Value,
}

pub fn tool_call_schema_json() -> String {
    serde_json::to_string_pretty(&schema_for!(ToolCallFormat)).unwrap_or_default()
}

pub fn final_answer_schema_json() -> String {
    serde_json::to_string_pretty(&schema_for!(FinalAnswerFormat)).unwrap_or_default()
}
