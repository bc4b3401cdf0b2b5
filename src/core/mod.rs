//! 核心编排层：错误类型与单轮对话编排器

pub mod error;
pub mod orchestrator;

pub use error::{AgentError, ToolError};
pub use orchestrator::{Orchestrator, GREETING};
