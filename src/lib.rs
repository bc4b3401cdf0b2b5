//! Barista - Coffee Bot：咖啡店新员工助手
//!
//! 模块划分：
//! - **agent**: 按配置装配 LLM / 知识库 / 工具 / Orchestrator
//! - **channel**: 入站/出站消息、最终回答合约、ResponseRouter
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与单轮对话编排器
//! - **integrations**: HTTP 通道（feature `server`）
//! - **knowledge**: 配方模型与校验、JSON 文件知识库、自由文本抽取
//! - **llm**: LLM 客户端抽象与实现（Azure OpenAI / OpenAI 兼容 / Mock）
//! - **memory**: 对话历史与按会话 ID 的内存 checkpoint
//! - **observability**: tracing 初始化
//! - **react**: Planner 与工具编排主循环
//! - **tools**: RecipeQuery / AddRecipe / CurrentDateTime、注册表与执行器

pub mod agent;
pub mod channel;
pub mod config;
pub mod core;
pub mod integrations;
pub mod knowledge;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod react;
pub mod tools;

pub use crate::channel::{InboundMessage, OutboundMessage};
pub use crate::core::{AgentError, Orchestrator};
pub use crate::knowledge::{KnowledgeStore, Recipe};
