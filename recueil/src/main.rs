mod config;
mod error;
mod server;

use axum::serve;
use crate::config::{Config, LoggingConfig};
use crate::error::{RecueilError, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_tracing(&config.logging)?;
    info!("Starting Recueil...");
    info!("Configuration loaded, store backend: {:?}", config.store.backend);

    // 初始化应用状态
    let app_state = server::init_app_state(&config).await?;
    info!("Application state initialized");

    // 创建路由
    let app = server::create_router(app_state);

    // 启动HTTP服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// `RUST_LOG` 优先于配置中的级别
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| RecueilError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| RecueilError::Logging(e.to_string()))
}
