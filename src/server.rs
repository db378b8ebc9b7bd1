//! 服务启动
//!
//! 根据配置选择存储实现，构造服务对象并注入路由状态，然后监听端口，
//! 收到 Ctrl+C 或 SIGTERM 时优雅退出。

use std::sync::Arc;
use std::time::Duration;

use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

use crate::app::{
    build_router,
    stars::{handler::AppState, repository::StarStore, service::StarService},
};
use crate::infrastructure::{config::Config, memory::MemoryStarStore};

/// 按配置创建存储
pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn StarStore>> {
    match &config.database.url {
        #[cfg(feature = "database")]
        Some(url) => {
            use crate::infrastructure::database::{DatabaseManager, PgStarStore};

            let manager = DatabaseManager::new(url, &config.database).await?;
            let store = PgStarStore::new(&manager);
            store.ensure_schema().await?;
            info!("已连接 PostgreSQL 存储");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "database"))]
        Some(_) => anyhow::bail!("DATABASE_URL 已设置，但编译时未启用 database 特性"),
        None => {
            warn!("未配置 DATABASE_URL，使用内存存储，重启后数据丢失");
            Ok(Arc::new(MemoryStarStore::new()))
        }
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = connect_store(&config).await?;
    let state = AppState {
        star_service: StarService::new(store, config.pagination),
    };

    let app = build_router(state, Duration::from_secs(config.server.timeout_seconds));

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("🚀 Hollywood Stars API 运行在 http://{}", listener.local_addr()?);
    info!("   POST   /hollywoodStars       - 创建明星");
    info!("   GET    /hollywoodStars       - 分页列表 (?page=1&limit=6&search=term)");
    info!("   GET    /hollywoodStars/:id   - 获取明星");
    info!("   PUT    /hollywoodStars/:id   - 更新明星");
    info!("   DELETE /hollywoodStars/:id   - 删除明星");
    info!("   GET    /health               - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
