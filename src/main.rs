use hollywood_stars::infrastructure::{
    config::{load_config, log_config},
    logger::Logger,
};
use hollywood_stars::server;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let _log_guard = Logger::init(&config.logging)?;

    info!("启动 Hollywood Stars API 服务器...");
    log_config(&config);

    server::run(config).await.map_err(|e| {
        error!("服务器运行失败: {}", e);
        e
    })
}
