//! 通道边界上的消息结构：入站用户消息与出站渲染

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Adaptive Card 附件的 content type 标识
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// 入站消息：一轮对话的用户输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub text: String,
    pub conversation_id: String,
}

impl InboundMessage {
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conversation_id: conversation_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: Value,
}

/// 出站消息：纯文本，或携带附件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text { text: String },
    Attachment { attachments: Vec<Attachment> },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn adaptive_card(card: Value) -> Self {
        Self::Attachment {
            attachments: vec![Attachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
                content: card,
            }],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Attachment { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inbound_uses_camel_case() {
        let msg: InboundMessage =
            serde_json::from_value(json!({"text": "hi", "conversationId": "c-1"})).unwrap();
        assert_eq!(msg, InboundMessage::new("c-1", "hi"));
    }

    #[test]
    fn test_outbound_wire_shape() {
        assert_eq!(
            serde_json::to_value(OutboundMessage::text("hello")).unwrap(),
            json!({"type": "text", "text": "hello"})
        );
        let card = serde_json::to_value(OutboundMessage::adaptive_card(json!({"type": "AdaptiveCard"})))
            .unwrap();
        assert_eq!(card["type"], "attachment");
        assert_eq!(card["attachments"][0]["contentType"], ADAPTIVE_CARD_CONTENT_TYPE);
    }
}
