//! Barista - Coffee Bot 服务
//!
//! 入口：初始化日志、加载配置、装配 Orchestrator，并在 HTTP 通道上监听。
//!
//! 环境变量:
//! - AZURE_OPENAI_API_KEY / AZURE_OPENAI_ENDPOINT / AZURE_OPENAI_DEPLOYMENT_NAME（provider = azure）
//! - OPENAI_API_KEY（provider = openai）
//! - BARISTA__*：覆盖 config/default.toml 中的任意键
//!
//! 启动: cargo run -- [config.toml]

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use barista::agent::create_orchestrator;
    use barista::config::load_config;
    use barista::integrations::http::create_router;

    barista::observability::init();

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    let orchestrator = create_orchestrator(&cfg)
        .await
        .context("Failed to create orchestrator")?;
    let app = create_router(Arc::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(&cfg.app.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.app.listen_addr))?;
    tracing::info!(
        "{} listening on http://{}/api/messages",
        cfg.app.name,
        cfg.app.listen_addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    eprintln!("请使用 --features server 编译: cargo run --features server");
    std::process::exit(1);
}
