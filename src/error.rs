use thiserror::Error;

/// 抓取任务错误类型
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 已有任务在运行，本次启动被拒绝
    #[error("Scraping already in progress")]
    Conflict,

    /// 列表页上没有发现任何比赛
    #[error("{0}")]
    Discovery(String),

    /// 单场比赛抓取失败（只记录在对应的 GameTask 上）
    #[error("比赛 {url} 抓取失败: {reason}")]
    PerGame { url: String, reason: String },

    /// 没有可下载的数据
    #[error("No data available for download")]
    NoData,

    /// 表格生成失败
    #[error("Failed to generate CSV content: {0}")]
    Serialization(String),

    /// 释放浏览器资源失败（只记录日志）
    #[error("释放浏览器资源失败: {0}")]
    ResourceCleanup(String),

    /// 页面导航超时
    #[error("导航到 {url} 超时 ({timeout_secs}s)")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 任务内部的意外错误
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(err.to_string())
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(err: toml::de::Error) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl ScrapeError {
    /// 创建单场比赛失败错误
    pub fn per_game(url: impl Into<String>, source: &anyhow::Error) -> Self {
        ScrapeError::PerGame {
            url: url.into(),
            reason: format!("{:#}", source),
        }
    }

    /// 对外展示时的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ScrapeError::Conflict => 409,
            ScrapeError::NoData => 404,
            _ => 500,
        }
    }
}

// ========== Result 类型别名 ==========

/// 抓取结果类型
pub type ScrapeResult<T> = Result<T, ScrapeError>;
