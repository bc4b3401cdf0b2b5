//! HTTP 通道
//!
//! - POST /api/messages：入站 `{text, conversationId}`，返回出站消息 JSON
//! - POST /api/conversations：新建会话，返回会话 ID 与开场白
//! - GET  /health
//!
//! 请求鉴权不在这里处理，部署时由前置网关负责。

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::Serialize;

use crate::channel::{InboundMessage, OutboundMessage};
use crate::core::Orchestrator;

pub type HttpState = Arc<Orchestrator>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    pub conversation_id: String,
    pub greeting: OutboundMessage,
}

pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/messages", post(receive_message))
        .route("/api/conversations", post(start_conversation))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

async fn receive_message(
    State(orchestrator): State<HttpState>,
    Json(inbound): Json<InboundMessage>,
) -> Result<Json<OutboundMessage>, StatusCode> {
    if inbound.conversation_id.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    tracing::debug!(conversation_id = %inbound.conversation_id, "inbound message");
    Ok(Json(orchestrator.respond(&inbound).await))
}

async fn start_conversation(State(orchestrator): State<HttpState>) -> Json<NewConversation> {
    let conversation_id = uuid::Uuid::new_v4().to_string();
    orchestrator.sessions().get_or_create(&conversation_id).await;
    tracing::info!(conversation_id = %conversation_id, "conversation started");
    Json(NewConversation {
        conversation_id,
        greeting: orchestrator.greeting(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::memory::SessionStore;
    use crate::react::Planner;
    use crate::tools::{ToolExecutor, ToolRegistry};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(script: Vec<&str>) -> Router {
        let llm = Arc::new(MockLlmClient::scripted(script));
        let orch = Orchestrator::new(
            Planner::new(llm, "system", 5),
            ToolExecutor::new(ToolRegistry::new(), 5),
            SessionStore::new(10),
        );
        create_router(Arc::new(orch))
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_message_round_trip() {
        let (status, body) = post_json(
            app(vec![r#"{"contentType":"Text","content":"Steam the milk to 65C."}"#]),
            "/api/messages",
            serde_json::json!({"text": "latte temp?", "conversationId": "c1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"type": "text", "text": "Steam the milk to 65C."}));
    }

    #[tokio::test]
    async fn test_turn_failure_returns_generic_notice() {
        let (status, body) = post_json(
            app(vec![r#"{"contentType":"Bogus","content":"x"}"#]),
            "/api/messages",
            serde_json::json!({"text": "hi", "conversationId": "c1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().starts_with("Sorry"));
    }

    #[tokio::test]
    async fn test_empty_conversation_id_rejected() {
        let (status, _) = post_json(
            app(vec![]),
            "/api/messages",
            serde_json::json!({"text": "hi", "conversationId": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_conversation_greets() {
        let (status, body) = post_json(app(vec![]), "/api/conversations", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversationId"].as_str().unwrap().len(), 36);
        assert!(body["greeting"]["text"].as_str().unwrap().contains("Coffee Bot"));
    }
}
