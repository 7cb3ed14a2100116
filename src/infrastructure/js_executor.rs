//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 + 执行 JS"的能力

use super::page_driver::{BrowserProfile, WaitUntil};
use crate::error::ScrapeError;
use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// 网络静止检测的轮询间隔
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// 页面已加载的资源数，配合 readyState 判断网络是否静止
const RESOURCE_COUNT_JS: &str = r#"
(() => ({
    ready: document.readyState === 'complete',
    resources: performance.getEntriesByType('resource').length
}))()
"#;

#[derive(Debug, Deserialize)]
struct LoadStatus {
    ready: bool,
    resources: u64,
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 goto() / eval() 能力
/// - 不认识比赛 / 数据行
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 设置 UA、额外请求头和视口
    pub async fn configure(&self, profile: &BrowserProfile) -> Result<()> {
        self.page
            .execute(SetUserAgentOverrideParams::new(profile.user_agent.clone()))
            .await
            .context("设置 User-Agent 失败")?;

        let headers: serde_json::Map<String, JsonValue> = profile
            .extra_headers
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        self.page
            .execute(SetExtraHttpHeadersParams::new(Headers::new(
                JsonValue::Object(headers),
            )))
            .await
            .context("设置请求头失败")?;

        let (width, height) = profile.viewport;
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                width as i64,
                height as i64,
                1.0,
                false,
            ))
            .await
            .context("设置视口失败")?;

        debug!("浏览器伪装参数已设置: {}x{}", width, height);
        Ok(())
    }

    /// 导航到指定 URL
    ///
    /// 整个导航（含网络静止等待）共用一个超时。
    pub async fn goto(&self, url: &str, wait: WaitUntil, limit: Duration) -> Result<()> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .with_context(|| format!("导航到 {} 失败", url))?;
            match wait {
                WaitUntil::Load => Ok(()),
                WaitUntil::NetworkAlmostIdle => self.wait_for_quiet_network(1).await,
                WaitUntil::NetworkIdle => self.wait_for_quiet_network(2).await,
            }
        };

        match timeout(limit, navigation).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: limit.as_secs(),
            }
            .into()),
        }
    }

    /// 资源数连续 `quiet_polls` 次不变即视为静止
    async fn wait_for_quiet_network(&self, quiet_polls: usize) -> Result<()> {
        let mut last_count: Option<u64> = None;
        let mut quiet = 0;

        while quiet < quiet_polls {
            sleep(IDLE_POLL_INTERVAL).await;
            let status: LoadStatus = self.eval_as(RESOURCE_COUNT_JS).await?;
            let count = Some(status.resources);

            if status.ready && count == last_count {
                quiet += 1;
            } else {
                quiet = 0;
            }
            last_count = count;
        }
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
