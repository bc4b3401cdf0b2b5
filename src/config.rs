//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `BARISTA__*` 覆盖（双下划线表示嵌套，如 `BARISTA__LLM__PROVIDER=mock`）。
//! API Key 等敏感信息不进配置文件，只从环境变量读取。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub knowledge: KnowledgeSection,
    pub agent: AgentSection,
}

/// [app] 段：名称与 HTTP 监听地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub listen_addr: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "Coffee Bot".to_string(),
            listen_addr: "0.0.0.0:3978".to_string(),
        }
    }
}

/// [llm] 段：后端选择、模型、温度与超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// azure / openai / mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub azure: LlmAzureSection,
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            temperature: 0.0,
            azure: LlmAzureSection::default(),
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

/// [llm.azure] 段：endpoint / deployment 缺省时读 AZURE_OPENAI_ENDPOINT / AZURE_OPENAI_DEPLOYMENT_NAME
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmAzureSection {
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub api_version: String,
}

impl Default for LlmAzureSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment: None,
            api_version: "2024-12-01-preview".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    /// 单次模型调用超时（秒）
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 60 }
    }
}

/// [knowledge] 段：配方知识库文件
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeSection {
    pub recipes_path: PathBuf,
}

impl Default for KnowledgeSection {
    fn default() -> Self {
        Self {
            recipes_path: PathBuf::from("knowledge/recipes.json"),
        }
    }
}

/// [agent] 段：编排循环参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    /// 单轮最多调用模型的次数
    pub max_steps: usize,
    /// 每个会话保留的对话轮数
    pub max_context_turns: usize,
    pub tool_timeout_secs: u64,
    /// 覆盖内置 system prompt
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_steps: 10,
            max_context_turns: 20,
            tool_timeout_secs: 120,
            system_prompt_path: None,
        }
    }
}

/// 从 config 目录加载配置，环境变量 BARISTA__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 BARISTA__*
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    for name in ["config/default", "../config/default"] {
        if std::path::Path::new(&format!("{name}.toml")).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(path) = config_path.filter(|p| p.exists()) {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("BARISTA")
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}
