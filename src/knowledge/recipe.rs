//! 配方数据模型与校验
//!
//! `validate` 作用于尚未反序列化的 JSON 值：模型输出先过这一关，才会变成 `Recipe`。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一条咖啡配方。写入知识库后不可修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        ingredients: impl IntoIterator<Item = impl Into<String>>,
        steps: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// 类型已由 serde 保证，这里只剩名称非空
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// 名称大小写不敏感的子串匹配
    pub fn matches(&self, term_lower: &str) -> bool {
        self.name.to_lowercase().contains(term_lower)
    }
}

/// 候选结构是否满足 Recipe schema：
/// name 为非空字符串；ingredients / steps 为数组且每个元素都是字符串。空数组视为合法。
pub fn validate(candidate: &Value) -> bool {
    let Some(obj) = candidate.as_object() else {
        return false;
    };
    let name_ok = obj
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|n| !n.is_empty());
    name_ok && is_string_array(obj.get("ingredients")) && is_string_array(obj.get("steps"))
}

fn is_string_array(v: Option<&Value>) -> bool {
    v.and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_string))
}
