use crate::config::Config;
use crate::error::ScrapeError;
use crate::infrastructure::{BrowserProfile, JsExecutor, PageDriver, PageLauncher, WaitUntil};
use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动参数：降低资源占用并减少自动化特征
const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--disable-gpu",
    "--disable-web-security",
    "--disable-features=VizDisplayCompositor",
    "--disable-extensions",
    "--disable-plugins",
    "--disable-images",
    "--disable-javascript-harmony-shipping",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-field-trial-config",
    "--disable-back-forward-cache",
    "--disable-ipc-flooding-protection",
];

/// CDP 请求超时比单次导航超时多留的余量，保证先由导航超时报错
const REQUEST_TIMEOUT_HEADROOM: Duration = Duration::from_secs(10);

/// 按配置启动 Chromium 的页面工厂
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumLauncher {
    headless: bool,
    chrome_executable: Option<String>,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            request_timeout: request_timeout_for(config.navigation_timeout()),
        }
    }

    /// 传给 chromiumoxide 的 CDP 请求超时
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// chromiumoxide 默认 30 秒就丢弃未完成的请求，这里放宽到导航超时之上
pub fn request_timeout_for(navigation_timeout: Duration) -> Duration {
    navigation_timeout + REQUEST_TIMEOUT_HEADROOM
}

#[async_trait]
impl PageLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        let session = launch_headless_browser(
            self.headless,
            self.chrome_executable.as_deref(),
            self.request_timeout,
        )
        .await?;
        Ok(Box::new(session))
    }
}

/// 一次任务独占的浏览器 + 页面
pub struct ChromiumSession {
    browser: Browser,
    executor: JsExecutor,
    handler_task: JoinHandle<()>,
}

/// 启动无头浏览器并打开空白页
pub async fn launch_headless_browser(
    headless: bool,
    chrome_executable: Option<&str>,
    request_timeout: Duration,
) -> Result<ChromiumSession> {
    info!("🚀 启动浏览器 (headless: {})...", headless);

    let mut builder = BrowserConfig::builder()
        .args(CHROME_ARGS.iter().copied())
        .request_timeout(request_timeout);
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = chrome_executable {
        debug!("使用指定的浏览器: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        ScrapeError::Browser(format!("配置浏览器失败: {}", e))
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        ScrapeError::Browser(format!("启动浏览器失败: {}", e))
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        ScrapeError::from(e)
    })?;

    info!("✅ 浏览器已就绪");
    Ok(ChromiumSession {
        browser,
        executor: JsExecutor::new(page),
        handler_task,
    })
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn configure(&self, profile: &BrowserProfile) -> Result<()> {
        self.executor.configure(profile).await
    }

    async fn goto(&self, url: &str, wait: WaitUntil, timeout: Duration) -> Result<()> {
        self.executor.goto(url, wait, timeout).await
    }

    async fn eval(&self, script: &str) -> Result<JsonValue> {
        self.executor.eval(script).await
    }

    async fn close(&mut self) -> Result<()> {
        info!("正在关闭浏览器...");
        let closed = self.browser.close().await;
        self.handler_task.abort();
        closed?;
        self.browser.wait().await?;
        info!("浏览器已关闭");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_request_timeout_exceeds_navigation_timeout() {
        let config = Config::default();
        let launcher = ChromiumLauncher::new(&config);
        assert_eq!(launcher.request_timeout(), Duration::from_secs(130));
        assert!(launcher.request_timeout() > config.navigation_timeout());

        let config = Config {
            navigation_timeout_secs: 300,
            ..Config::default()
        };
        assert_eq!(
            ChromiumLauncher::new(&config).request_timeout(),
            Duration::from_secs(310)
        );
    }
}
