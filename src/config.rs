use crate::error::{ScrapeError, ScrapeResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件名（存在时自动加载）
pub const DEFAULT_CONFIG_FILE: &str = "scraper.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务端口
    pub server_port: u16,
    /// 比赛列表页
    pub listing_url: String,
    /// 站点根地址，用于补全相对链接
    pub site_base_url: String,
    /// 浏览器可执行文件路径（为空时由 chromiumoxide 自动查找）
    pub chrome_executable: Option<String>,
    /// 是否使用无头模式
    pub headless: bool,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// 单次导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 列表页加载后的等待时间（毫秒）
    pub listing_settle_ms: u64,
    /// 提取链接前的额外等待（毫秒）
    pub discovery_settle_ms: u64,
    /// 比赛页加载后的等待时间（毫秒）
    pub game_settle_ms: u64,
    /// 滚动到底部后的等待时间（毫秒）
    pub scroll_settle_ms: u64,
    /// 两场比赛之间的间隔（毫秒）
    pub inter_game_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 比赛页选择器
    pub splits: SplitsSelectors,
}

/// Season Splits 区块的定位方式
///
/// 目标站点的 class 名是构建产物，改版后直接在配置文件里覆盖即可。
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SplitsSelectors {
    pub section_xpath: String,
    pub percentage: String,
    pub record: String,
    pub pitcher: String,
}

impl Default for SplitsSelectors {
    fn default() -> Self {
        Self {
            section_xpath: "/html/body/div[1]/div[1]/div[5]/div/div/div[2]/main/section[4]"
                .to_string(),
            percentage: ".sc-2d876bef-0.jbGCWn".to_string(),
            record: ".sc-2d876bef-0.eoDCvc".to_string(),
            pitcher: ".sc-2d876bef-0.vVAPS".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            listing_url: "https://www.sportsline.com/mlb/odds/".to_string(),
            site_base_url: "https://www.sportsline.com".to_string(),
            chrome_executable: None,
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            navigation_timeout_secs: 120,
            listing_settle_ms: 5_000,
            discovery_settle_ms: 8_000,
            game_settle_ms: 10_000,
            scroll_settle_ms: 3_000,
            inter_game_delay_ms: 8_000,
            verbose_logging: false,
            splits: SplitsSelectors::default(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件 → 环境变量
    ///
    /// 文件路径取自 `SCRAPER_CONFIG`，未设置时尝试当前目录下的 `scraper.toml`。
    pub fn load() -> ScrapeResult<Self> {
        let explicit = std::env::var("SCRAPER_CONFIG").ok();
        let base = match explicit.as_deref() {
            Some(path) => Self::from_file(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> ScrapeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ScrapeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// 只用默认值和环境变量构建配置
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        Self {
            server_port: env_parse("PORT").unwrap_or(self.server_port),
            listing_url: std::env::var("LISTING_URL").unwrap_or(self.listing_url),
            site_base_url: std::env::var("SITE_BASE_URL").unwrap_or(self.site_base_url),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(self.chrome_executable),
            headless: env_parse("HEADLESS").unwrap_or(self.headless),
            navigation_timeout_secs: env_parse("NAVIGATION_TIMEOUT_SECS")
                .unwrap_or(self.navigation_timeout_secs),
            inter_game_delay_ms: env_parse("INTER_GAME_DELAY_MS")
                .unwrap_or(self.inter_game_delay_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            ..self
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn listing_settle(&self) -> Duration {
        Duration::from_millis(self.listing_settle_ms)
    }

    pub fn discovery_settle(&self) -> Duration {
        Duration::from_millis(self.discovery_settle_ms)
    }

    pub fn game_settle(&self) -> Duration {
        Duration::from_millis(self.game_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn inter_game_delay(&self) -> Duration {
        Duration::from_millis(self.inter_game_delay_ms)
    }

    /// 所有等待都为零的配置，供测试和本地调试使用
    pub fn without_delays(self) -> Self {
        Self {
            listing_settle_ms: 0,
            discovery_settle_ms: 0,
            game_settle_ms: 0,
            scroll_settle_ms: 0,
            inter_game_delay_ms: 0,
            ..self
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
