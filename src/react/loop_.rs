//! 工具编排主循环
//!
//! Thinking（调用模型）-> 若为工具调用则 ToolDispatch（执行并回灌结果）-> 回到 Thinking，
//! 直到模型给出最终回答（Finalized）。同一轮内工具串行执行；步数有上限。
//! 工具层错误（未知工具、参数错误、超时、抽取/存储失败）转成 `{"error": ...}` 回灌，不中断本轮；
//! 模型调用失败、最终回答不合约则整轮失败。

use serde_json::json;

use crate::channel::FinalAnswer;
use crate::core::AgentError;
use crate::memory::Message;
use crate::react::planner::{parse_llm_output, Planner, PlannerOutput};
use crate::tools::ToolExecutor;

/// 单轮对话内默认最大步数（每步一次模型调用）
pub const DEFAULT_MAX_STEPS: usize = 10;
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 一轮对话的结果：最终回答 + 本轮新增的消息（由调用方写回会话历史）
#[derive(Debug)]
pub struct TurnResult {
    pub answer: FinalAnswer,
    pub new_messages: Vec<Message>,
    pub steps: usize,
    pub tools_used: Vec<String>,
}

/// 循环所需的组件（Planner / ToolExecutor 在多会话间共享）
pub struct ReactSession<'a> {
    pub planner: &'a Planner,
    pub executor: &'a ToolExecutor,
    pub max_steps: usize,
}

impl<'a> ReactSession<'a> {
    pub fn new(planner: &'a Planner, executor: &'a ToolExecutor) -> Self {
        Self {
            planner,
            executor,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }
}

/// 运行一轮：history 为该会话此前的历史（只读），user_input 为本轮用户消息
pub async fn react_loop(
    session: &ReactSession<'_>,
    history: &[Message],
    user_input: &str,
) -> Result<TurnResult, AgentError> {
    let turn_start = history.len();
    let mut context = history.to_vec();
    context.push(Message::user(user_input));
    let mut tools_used = Vec::new();

    for step in 0..session.max_steps {
        tracing::debug!(step, max_steps = session.max_steps, "thinking");
        let output = session.planner.plan(&context).await?;

        match parse_llm_output(&output) {
            PlannerOutput::ToolCall(tc) => {
                tracing::info!(step, tool = %tc.tool, "model requested tool");
                let request = json!({ "tool": tc.tool, "args": tc.args });
                let payload = match session.executor.execute(&tc.tool, tc.args).await {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(tool = %tc.tool, error = %e, "tool failed, feeding error back");
                        e.to_payload()
                    }
                };
                tracing::debug!(
                    tool = %tc.tool,
                    observation = %preview(&payload.to_string()),
                    "observation"
                );
                context.push(Message::assistant(request.to_string()));
                context.push(Message::observation(&tc.tool, &payload));
                tools_used.push(tc.tool);
            }
            PlannerOutput::Final(raw) => {
                let answer = FinalAnswer::parse(&raw).inspect_err(|e| {
                    tracing::error!(error = %e, raw = %preview(&raw), "final answer violates contract");
                })?;
                context.push(Message::assistant(raw));
                return Ok(TurnResult {
                    answer,
                    new_messages: context.split_off(turn_start),
                    steps: step + 1,
                    tools_used,
                });
            }
        }
    }

    tracing::warn!(max_steps = session.max_steps, "tool loop exceeded step limit");
    Err(AgentError::LoopExceeded(session.max_steps))
}

fn preview(s: &str) -> String {
    if s.chars().count() > OBSERVATION_PREVIEW_CHARS {
        format!("{}...", s.chars().take(OBSERVATION_PREVIEW_CHARS).collect::<String>())
    } else {
        s.to_string()
    }
}
