//! 配方抽取：自由文本 -> 经校验的 Recipe
//!
//! 只调用一次模型，不重试。模型输出不保证是干净 JSON，因此分两段解析：
//! 先整体严格解析；失败则取第一个配平的 `{...}` 片段再解析。

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;

use crate::knowledge::{validate, Recipe};
use crate::llm::LlmClient;
use crate::memory::Message;

/// 抽取失败（对调用方都是可恢复的：告诉用户即可，不中断对话）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Failed to parse recipe from input text.")]
    Unparsable,

    #[error("Parsed recipe did not match expected schema.")]
    SchemaMismatch,

    #[error("Recipe extraction timed out after {0}s")]
    Timeout(u64),

    #[error("Recipe extraction model call failed: {0}")]
    Llm(String),
}

/// 哪一段解析成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// 整段输出即合法 JSON
    Strict,
    /// 从夹杂说明文字的输出中截取出的 JSON 片段
    Recovered,
}

pub struct RecipeExtractor {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl RecipeExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, timeout_secs: u64) -> Self {
        Self {
            llm,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub async fn extract(&self, free_text: &str) -> Result<Recipe, ExtractionError> {
        let prompt = extraction_prompt(free_text);
        tracing::debug!(prompt = %prompt, "sending recipe extraction prompt");

        let response = timeout(self.timeout, self.llm.complete(&[Message::user(prompt)]))
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout.as_secs()))?
            .map_err(ExtractionError::Llm)?;
        tracing::debug!(raw = %response, "raw extraction response");

        let (candidate, stage) = parse_recipe_response(&response).inspect_err(|_| {
            tracing::error!(raw = %response, "failed to parse recipe from LLM response");
        })?;
        if stage == ParseStage::Recovered {
            tracing::warn!("direct JSON parse failed, recovered recipe from embedded object");
        }

        if !validate(&candidate) {
            tracing::warn!(candidate = %candidate, "parsed recipe did not match schema");
            return Err(ExtractionError::SchemaMismatch);
        }
        serde_json::from_value(candidate).map_err(|_| ExtractionError::SchemaMismatch)
    }
}

fn extraction_prompt(free_text: &str) -> String {
    format!(
        "Extract the coffee recipe from the following text and return ONLY a JSON object with this schema:\n\
         {{\n  \"name\": string,\n  \"ingredients\": string[],\n  \"steps\": string[]\n}}\n\
         Only output the JSON object.\n\
         Recipe text:\n{free_text}"
    )
}

/// 两段式解析模型输出，返回 JSON 值与成功的阶段；两段都失败为 Unparsable
pub fn parse_recipe_response(text: &str) -> Result<(Value, ParseStage), ExtractionError> {
    if let Ok(v) = serde_json::from_str::<Value>(text.trim()) {
        return Ok((v, ParseStage::Strict));
    }
    let span = first_balanced_object(text).ok_or(ExtractionError::Unparsable)?;
    serde_json::from_str::<Value>(span)
        .map(|v| (v, ParseStage::Recovered))
        .map_err(|_| ExtractionError::Unparsable)
}

/// 第一个配平的 `{...}` 片段；跳过 JSON 字符串内的花括号与转义。
/// 从某个 `{` 起扫到结尾仍未配平时，改从下一个 `{` 重新扫描。
pub fn first_balanced_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_len(&text[start..]).map(|len| &text[start..start + len]))
}

/// `s` 以 `{` 开头；返回与之配对的 `}` 之后的字节长度
fn balanced_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
