use anyhow::Result;
use mlb_splits_scraper::server;
use mlb_splits_scraper::{logger, ChromiumLauncher, Config, JobControl, ProgressHandle, ScrapeOrchestrator};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let launcher = Arc::new(ChromiumLauncher::new(&config));
    let port = config.server_port;
    let orchestrator = ScrapeOrchestrator::new(config, launcher, ProgressHandle::new());
    let control = Arc::new(JobControl::new(orchestrator));

    server::start_server(control, port).await
}
