use tokio::signal;
use tracing::info;

/// 等待 Ctrl+C 或 SIGTERM，用于优雅退出
pub async fn terminate() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("监听 Ctrl+C 信号失败: {}", e);
            std::future::pending::<()>().await;
        }
        info!("收到 Ctrl+C，准备退出");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("收到 SIGTERM，准备退出");
            }
            Err(e) => {
                tracing::error!("监听 SIGTERM 信号失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
