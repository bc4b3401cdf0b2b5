//! ResponseRouter：结构化最终回答 -> 通道渲染

use thiserror::Error;

use crate::channel::{FinalAnswer, OutboundMessage};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Unrecognized contentType: {0}")]
    UnknownContentType(String),

    #[error("Malformed content for {content_type}: expected {expected}")]
    MalformedContent {
        content_type: String,
        expected: &'static str,
    },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseRouter;

impl ResponseRouter {
    pub fn new() -> Self {
        Self
    }

    /// Text 必须是字符串；AdaptiveCard 必须已是 JSON 对象；其它 contentType 一律报错
    pub fn route(&self, answer: FinalAnswer) -> Result<OutboundMessage, RoutingError> {
        let malformed = |expected| RoutingError::MalformedContent {
            content_type: answer.content_type.clone(),
            expected,
        };
        match answer.content_type.as_str() {
            "Text" => match &answer.content {
                serde_json::Value::String(s) => Ok(OutboundMessage::text(s.clone())),
                _ => Err(malformed("a string")),
            },
            "AdaptiveCard" => {
                if answer.content.is_object() {
                    Ok(OutboundMessage::adaptive_card(answer.content.clone()))
                } else {
                    Err(malformed("a JSON object"))
                }
            }
            other => Err(RoutingError::UnknownContentType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ADAPTIVE_CARD_CONTENT_TYPE;
    use serde_json::json;

    #[test]
    fn test_route_text() {
        let out = ResponseRouter::new().route(FinalAnswer::text("hello")).unwrap();
        assert_eq!(out, OutboundMessage::text("hello"));
    }

    #[test]
    fn test_route_adaptive_card() {
        let card = json!({"type": "AdaptiveCard", "version": "1.5", "body": []});
        let out = ResponseRouter::new()
            .route(FinalAnswer::adaptive_card(card.clone()))
            .unwrap();
        match out {
            OutboundMessage::Attachment { attachments } => {
                assert_eq!(attachments.len(), 1);
                assert_eq!(attachments[0].content_type, ADAPTIVE_CARD_CONTENT_TYPE);
                assert_eq!(attachments[0].content, card);
            }
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_route_unknown_content_type() {
        let answer = FinalAnswer {
            content_type: "Bogus".into(),
            content: json!("x"),
        };
        assert_eq!(
            ResponseRouter::new().route(answer),
            Err(RoutingError::UnknownContentType("Bogus".into()))
        );
    }

    #[test]
    fn test_route_malformed_content() {
        let card_as_string = FinalAnswer::adaptive_card(json!("{\"type\":\"AdaptiveCard\"}"));
        assert!(matches!(
            ResponseRouter::new().route(card_as_string),
            Err(RoutingError::MalformedContent { .. })
        ));
        let text_as_object = FinalAnswer {
            content_type: "Text".into(),
            content: json!({"a": 1}),
        };
        assert!(ResponseRouter::new().route(text_as_object).is_err());
    }
}
