//! 页面能力抽象
//!
//! 抓取流程只依赖这里的 trait，真实浏览器和测试用的假页面都实现它。

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// 导航完成的判断条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// load 事件触发即可
    Load,
    /// load 之后网络请求基本静止（允许少量长连接）
    NetworkAlmostIdle,
    /// load 之后网络请求完全静止
    NetworkIdle,
}

/// 浏览器伪装参数
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub extra_headers: Vec<(String, String)>,
    pub viewport: (u32, u32),
}

impl BrowserProfile {
    pub fn new(user_agent: impl Into<String>, viewport: (u32, u32)) -> Self {
        Self {
            user_agent: user_agent.into(),
            extra_headers: default_headers(),
            viewport,
        }
    }
}

fn default_headers() -> Vec<(String, String)> {
    [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("DNT", "1"),
        ("Connection", "keep-alive"),
        ("Upgrade-Insecure-Requests", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// 一个可导航、可执行脚本的页面
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 设置 UA、额外请求头和视口
    async fn configure(&self, profile: &BrowserProfile) -> Result<()>;

    /// 导航到指定地址，超时即失败
    async fn goto(&self, url: &str, wait: WaitUntil, timeout: Duration) -> Result<()>;

    /// 在页面上下文中执行脚本，返回可序列化的结果
    async fn eval(&self, script: &str) -> Result<JsonValue>;

    /// 释放页面及其所属的浏览器
    async fn close(&mut self) -> Result<()>;
}

/// 页面工厂，每个任务启动一次
#[async_trait]
pub trait PageLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageDriver>>;
}
