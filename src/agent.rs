//! Agent 装配
//!
//! 按配置构建 LLM、知识库、抽取器、工具注册表与 Orchestrator；所有组件只在这里创建一次，
//! 以 Arc 注入下游，不存在全局单例。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::{AgentError, Orchestrator};
use crate::knowledge::{KnowledgeStore, RecipeExtractor};
use crate::llm::{AzureDeployment, LlmClient, MockLlmClient, OpenAiClient};
use crate::memory::SessionStore;
use crate::react::Planner;
use crate::tools::{
    final_answer_schema_json, tool_call_schema_json, AddRecipeTool, CurrentDateTimeTool,
    RecipeQueryTool, ToolExecutor, ToolRegistry,
};

const BASE_SYSTEM_PROMPT: &str = "\
You are Coffee Bot, a friendly assistant that helps new hires at a coffee shop learn about coffee recipes, machine operation, and best practices.
You may ask follow up questions until you have enough information to answer the customer's question. Once you have the answer, present it clearly and concisely.
When a user shares a new recipe, use the AddRecipe tool to save it. Look recipes up with RecipeQuery instead of guessing.";

/// 根据配置与环境变量选择 LLM 后端（Azure OpenAI / OpenAI 兼容 / Mock）
pub fn create_llm_from_config(cfg: &AppConfig) -> Result<Arc<dyn LlmClient>, AgentError> {
    let llm = &cfg.llm;
    match llm.provider.to_lowercase().as_str() {
        "azure" => {
            let env = |key: &str| std::env::var(key).ok();
            let endpoint = llm
                .azure
                .endpoint
                .clone()
                .or_else(|| env("AZURE_OPENAI_ENDPOINT"))
                .ok_or_else(|| AgentError::ConfigError("AZURE_OPENAI_ENDPOINT is not set".into()))?;
            let deployment = llm
                .azure
                .deployment
                .clone()
                .or_else(|| env("AZURE_OPENAI_DEPLOYMENT_NAME"))
                .ok_or_else(|| {
                    AgentError::ConfigError("AZURE_OPENAI_DEPLOYMENT_NAME is not set".into())
                })?;
            let api_key = env("AZURE_OPENAI_API_KEY")
                .ok_or_else(|| AgentError::ConfigError("AZURE_OPENAI_API_KEY is not set".into()))?;
            let api_version = env("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| llm.azure.api_version.clone());

            tracing::info!(deployment = %deployment, api_version = %api_version, "Using Azure OpenAI LLM");
            Ok(Arc::new(
                OpenAiClient::azure(AzureDeployment {
                    endpoint,
                    deployment,
                    api_version,
                    api_key,
                })
                .with_temperature(llm.temperature),
            ))
        }
        "openai" => {
            tracing::info!(model = %llm.model, "Using OpenAI-compatible LLM");
            Ok(Arc::new(
                OpenAiClient::new(llm.base_url.as_deref(), &llm.model, None)
                    .with_temperature(llm.temperature),
            ))
        }
        "mock" => {
            tracing::warn!("Using Mock LLM (echo replies)");
            Ok(Arc::new(MockLlmClient::new()))
        }
        other => Err(AgentError::ConfigError(format!("unknown llm provider: {other}"))),
    }
}

/// 基础 prompt + 工具清单 + 输出格式约定
pub fn build_system_prompt(base: &str, registry: &ToolRegistry) -> String {
    format!(
        "{base}\n\n\
         ## Tools\n\
         To call a tool, reply with ONLY this JSON object and nothing else:\n\
         {{\"tool\": \"<tool name>\", \"args\": {{...}}}}\n\
         Schema:\n{call_schema}\n\
         Available tools:\n{tools}\n\n\
         ## Final answer\n\
         When you are done, respond in JSON format with the following JSON schema, and do not use markdown in the response:\n\
         {{\n    \"contentType\": \"'Text' or 'AdaptiveCard' only\",\n    \"content\": \"{{The content of the response, may be plain text, or JSON based adaptive card}}\"\n}}\n\
         Schema:\n{answer_schema}",
        call_schema = tool_call_schema_json(),
        tools = registry.to_schema_json(),
        answer_schema = final_answer_schema_json(),
    )
}

/// 共享知识库与 LLM，构建完整 Orchestrator
pub fn build_orchestrator(
    cfg: &AppConfig,
    llm: Arc<dyn LlmClient>,
    store: Arc<KnowledgeStore>,
) -> Orchestrator {
    let extractor = Arc::new(RecipeExtractor::new(llm.clone(), cfg.llm.timeouts.request));

    let mut tools = ToolRegistry::new();
    tools.register(RecipeQueryTool::new(store.clone()));
    tools.register(AddRecipeTool::new(extractor, store));
    tools.register(CurrentDateTimeTool);

    let base = cfg
        .agent
        .system_prompt_path
        .as_ref()
        .and_then(|p| match std::fs::read_to_string(p) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "system prompt file unreadable, using built-in");
                None
            }
        })
        .unwrap_or_else(|| BASE_SYSTEM_PROMPT.to_string());
    let system_prompt = build_system_prompt(base.trim(), &tools);
    tracing::debug!(system_prompt = %system_prompt, "system prompt ready");

    Orchestrator::new(
        Planner::new(llm, system_prompt, cfg.llm.timeouts.request),
        ToolExecutor::new(tools, cfg.agent.tool_timeout_secs),
        SessionStore::new(cfg.agent.max_context_turns),
    )
    .with_max_steps(cfg.agent.max_steps)
}

/// 从配置一次性装配：LLM 客户端 + 知识库（缺失时写入空数组）+ Orchestrator
pub async fn create_orchestrator(cfg: &AppConfig) -> Result<Orchestrator, AgentError> {
    let llm = create_llm_from_config(cfg)?;
    let store = Arc::new(KnowledgeStore::new(&cfg.knowledge.recipes_path));
    store
        .create_if_missing()
        .await
        .map_err(|e| AgentError::ConfigError(e.to_string()))?;
    tracing::info!(path = %store.path().display(), "recipes knowledge base ready");
    Ok(build_orchestrator(cfg, llm, store))
}
