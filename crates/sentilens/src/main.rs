mod api;
mod config;
mod dashboard;
mod database;
mod realtime;
mod sentiment;
mod service;
mod store;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::realtime::RealtimeHub;
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::service::AnalysisService;
use crate::store::SqliteAnalysisRepository;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    utils::init_logger(&config.log_level)?;
    info!("{} v{} 启动中", built_info::PKG_NAME, built_info::PKG_VERSION);

    let mut lexicon = LexiconScorer::new();
    if let Some(path) = &config.lexicon_extras {
        lexicon = lexicon
            .with_extras(path)
            .with_context(|| format!("加载额外词典失败: {}", path.display()))?;
    }
    if lexicon.is_empty() {
        warn!("情感词典为空，所有文本都将判为 Neutral");
    } else {
        info!("情感词典已加载，共 {} 个词", lexicon.len());
    }

    let connection = database::setup_database(&config).await?;
    let repository = Arc::new(SqliteAnalysisRepository::new(connection));
    let hub = RealtimeHub::new(config.broadcast_capacity);
    let service = Arc::new(AnalysisService::new(
        SentimentScorer::new(Arc::new(lexicon)),
        repository,
        Arc::new(hub.clone()),
        config.default_platform.clone(),
    ));

    let cors = api::build_cors(&config.cors_origin)?;
    let app = api::router(service, hub.clone(), cors);

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("绑定地址 {} 失败", address))?;
    info!("开始监听 http://{}", address);
    if config.cors_origin == "*" {
        warn!("跨域来源未限制，生产环境请设置 SENTILENS_CORS_ORIGIN");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            utils::signal::terminate().await;
            info!("收到退出信号，正在关闭实时连接");
            hub.shutdown();
        })
        .await
        .context("HTTP 服务异常退出")?;

    info!("服务已退出");
    Ok(())
}
