//! 认知层：Planner（模型调用与输出分类）与工具编排主循环

pub mod loop_;
pub mod planner;

pub use loop_::{react_loop, ReactSession, TurnResult, DEFAULT_MAX_STEPS};
pub use planner::{parse_llm_output, Planner, PlannerOutput, ToolCall};
