//! 会话存储（内存 checkpoint）
//!
//! conversation_id -> 对话历史。首条消息时创建，进程存活期间不销毁；仅适用于单实例部署。
//! 每个会话一把异步锁：同一会话的两轮对话串行执行，不同会话互不阻塞。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::memory::ConversationMemory;

/// 单会话句柄：持锁期间独占该会话历史
pub type SessionHandle = Arc<Mutex<ConversationMemory>>;

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_context_turns: usize,
}

impl SessionStore {
    pub fn new(max_context_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_context_turns,
        }
    }

    /// 获取或创建会话；map 锁只在查找/插入时持有，不跨 LLM 调用
    pub async fn get_or_create(&self, conversation_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(conversation_id) {
            return handle.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(conversation_id, "creating conversation state");
                Arc::new(Mutex::new(ConversationMemory::new(self.max_context_turns)))
            })
            .clone()
    }

    pub async fn get(&self, conversation_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(conversation_id).cloned()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Message;

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let store = SessionStore::new(10);
        let a = store.get_or_create("c1").await;
        a.lock().await.push_turn([Message::user("hello")]);
        let b = store.get_or_create("c1").await;
        assert_eq!(b.lock().await.len(), 1);
        assert_eq!(store.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_ids_are_isolated() {
        let store = SessionStore::new(10);
        store.get_or_create("c1").await.lock().await.push_turn([Message::user("x")]);
        let other = store.get_or_create("c2").await;
        assert!(other.lock().await.is_empty());
        assert!(store.get("missing").await.is_none());
    }
}
