//! Orchestrator：单轮对话的入口
//!
//! 按会话 ID 取出（或新建）对话历史，持该会话的锁跑完工具编排循环，
//! 把最终回答交给 ResponseRouter 渲染，成功后才把本轮消息写回历史。
//! 所有组件在启动时构建一次，通过构造参数注入，测试中可替换为 Mock。

use crate::channel::{InboundMessage, OutboundMessage, ResponseRouter};
use crate::core::AgentError;
use crate::memory::SessionStore;
use crate::react::{react_loop, Planner, ReactSession, DEFAULT_MAX_STEPS};
use crate::tools::ToolExecutor;

/// 用户加入会话时发送的自我介绍
pub const GREETING: &str =
    "Hi I am Coffee Bot, your personal coffee shop assistant! How may I help you?";

pub struct Orchestrator {
    planner: Planner,
    executor: ToolExecutor,
    router: ResponseRouter,
    sessions: SessionStore,
    max_steps: usize,
}

impl Orchestrator {
    pub fn new(planner: Planner, executor: ToolExecutor, sessions: SessionStore) -> Self {
        Self {
            planner,
            executor,
            router: ResponseRouter::new(),
            sessions,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    pub fn greeting(&self) -> OutboundMessage {
        OutboundMessage::text(GREETING)
    }

    /// 处理一轮；同一会话的并发请求在会话锁上排队
    pub async fn handle_turn(&self, inbound: &InboundMessage) -> Result<OutboundMessage, AgentError> {
        let handle = self.sessions.get_or_create(&inbound.conversation_id).await;
        let mut memory = handle.lock().await;

        let session = ReactSession::new(&self.planner, &self.executor).with_max_steps(self.max_steps);
        let result = react_loop(&session, memory.messages(), &inbound.text).await?;
        let outbound = self.router.route(result.answer)?;

        let (prompt_tokens, completion_tokens, total_tokens) = self.planner.token_usage();
        tracing::info!(
            conversation_id = %inbound.conversation_id,
            steps = result.steps,
            tools = ?result.tools_used,
            prompt_tokens,
            completion_tokens,
            total_tokens,
            "turn finalized"
        );
        memory.push_turn(result.new_messages);
        Ok(outbound)
    }

    /// 总能给出回复：整轮失败时只返回通用提示，不暴露内部错误
    pub async fn respond(&self, inbound: &InboundMessage) -> OutboundMessage {
        match self.handle_turn(inbound).await {
            Ok(out) => out,
            Err(e) => {
                tracing::error!(
                    conversation_id = %inbound.conversation_id,
                    error = %e,
                    "turn failed"
                );
                OutboundMessage::text(e.user_notice())
            }
        }
    }
}
