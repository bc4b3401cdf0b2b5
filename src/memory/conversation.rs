//! 对话历史
//!
//! 每个会话一份：保留最近 N 轮（超出时整轮剪掉最旧的），作为下一轮调用模型的上下文。
//! System 提示不入历史，每次调用模型时由 Planner 现拼。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// 工具结果回灌给模型：以 user 消息承载，模型据此继续推理
    pub fn observation(tool: &str, payload: &serde_json::Value) -> Self {
        Self::user(format!("Observation from {tool}: {payload}"))
    }
}

/// 单会话历史：按轮保存，最多保留最近 max_turns 轮。
/// 剪枝总是整轮丢弃，历史的第一条永远是某一轮的用户输入。
#[derive(Clone, Debug)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    turn_lens: VecDeque<usize>,
    max_turns: usize,
}

impl ConversationMemory {
    pub fn new(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            turn_lens: VecDeque::new(),
            max_turns,
        }
    }

    /// 一轮成功结束后整体写回本轮产生的消息（用户输入、工具往返、最终回答）
    pub fn push_turn(&mut self, msgs: impl IntoIterator<Item = Message>) {
        let before = self.messages.len();
        self.messages.extend(msgs);
        let added = self.messages.len() - before;
        if added > 0 {
            self.turn_lens.push_back(added);
        }
        self.prune();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn turns(&self) -> usize {
        self.turn_lens.len()
    }

    fn prune(&mut self) {
        let mut overflow = 0;
        while self.turn_lens.len() > self.max_turns {
            overflow += self.turn_lens.pop_front().unwrap_or(0);
        }
        self.messages.drain(..overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_most_recent_turns() {
        let mut mem = ConversationMemory::new(2);
        mem.push_turn([Message::user("a"), Message::assistant("b")]);
        mem.push_turn([Message::user("c"), Message::assistant("d")]);
        mem.push_turn([Message::user("e"), Message::assistant("f")]);
        assert_eq!(mem.turns(), 2);
        assert_eq!(mem.len(), 4);
        assert_eq!(mem.messages()[0].content, "c");
        assert_eq!(mem.messages()[3].content, "f");
    }

    #[test]
    fn test_prune_never_splits_a_tool_turn() {
        let payload = serde_json::json!({"name": "Caffe Latte"});
        let mut mem = ConversationMemory::new(1);
        mem.push_turn([Message::user("hi"), Message::assistant("hello")]);
        mem.push_turn([
            Message::user("latte?"),
            Message::assistant(r#"{"tool":"RecipeQuery","args":{"drink":"latte"}}"#),
            Message::observation("RecipeQuery", &payload),
            Message::assistant("final"),
        ]);

        assert_eq!(mem.turns(), 1);
        assert_eq!(mem.len(), 4);
        assert_eq!(mem.messages()[0], Message::user("latte?"));
        assert!(mem.messages()[2].content.starts_with("Observation from RecipeQuery"));
    }

    #[test]
    fn test_empty_turn_not_recorded() {
        let mut mem = ConversationMemory::new(3);
        mem.push_turn(Vec::new());
        assert_eq!(mem.turns(), 0);
        assert!(mem.is_empty());
    }

    #[test]
    fn test_observation_embeds_payload() {
        let msg = Message::observation("RecipeQuery", &serde_json::json!({"error": "nope"}));
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, r#"Observation from RecipeQuery: {"error":"nope"}"#);
    }
}
