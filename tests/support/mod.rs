//! 测试用的假页面：按脚本内容返回预设数据，不启动浏览器

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mlb_splits_scraper::config::Config;
use mlb_splits_scraper::infrastructure::{BrowserProfile, PageDriver, PageLauncher, WaitUntil};
use mlb_splits_scraper::ScrapeError;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

pub const LISTING_URL: &str = "https://www.sportsline.com/mlb/odds/";
pub const PRIMARY_SELECTOR: &str = r#"a[href*="/mlb/game-forecast/"]"#;
pub const CARD_SELECTOR: &str = r#"[data-testid="game-card"] a"#;

/// 比赛页的预设表现
#[derive(Debug, Clone)]
pub enum FakeGame {
    /// 区块存在，返回这些片段
    Section {
        percentages: Vec<String>,
        records: Vec<String>,
        pitchers: Vec<String>,
    },
    /// 区块不存在
    NoSection,
    /// 提取脚本执行失败
    EvalError,
    /// 导航超时
    NavTimeout,
    /// 提取时 panic
    Panic,
}

impl FakeGame {
    /// 完整的 10 组数据，附带双方先发投手
    pub fn full(away_pitcher: &str, home_pitcher: &str) -> Self {
        FakeGame::Section {
            percentages: (0..20).map(|i| format!("{}%", 40 + i)).collect(),
            records: (0..20).map(|i| format!("{}-{}, +{}", 10 + i, 8, i * 25)).collect(),
            pitchers: vec![
                format!("Team is 9-3 when {} starts", away_pitcher),
                format!("Team is 7-5 when {} starts", home_pitcher),
            ],
        }
    }

    /// 只有 `pairs` 组数据
    pub fn partial(pairs: usize) -> Self {
        FakeGame::Section {
            percentages: (0..pairs * 2).map(|i| format!("{}%", 50 + i)).collect(),
            records: (0..pairs * 2).map(|i| format!("{}-4, -{}", i, i * 5)).collect(),
            pitchers: Vec::new(),
        }
    }
}

/// 假站点：列表页链接 + 各比赛页表现
#[derive(Default)]
pub struct FakeSite {
    pub listing_links: Vec<(String, Vec<String>)>,
    pub games: HashMap<String, FakeGame>,
    pub fail_launch: bool,
    pub fail_close: bool,
    /// 设置后，列表页导航会等待放行
    pub gate: Option<Arc<Notify>>,
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
    /// 每次导航发生的时刻（与 `visited` 一一对应）
    pub visited_at: Mutex<Vec<Instant>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在首选策略下挂上链接，同时登记比赛页表现
    pub fn with_games(games: Vec<(&str, FakeGame)>) -> Self {
        let mut site = Self::new();
        let mut hrefs = Vec::new();
        for (game_id, behaviour) in games {
            let path = format!("/mlb/game-forecast/{}/", game_id);
            site.games.insert(game_url(game_id), behaviour);
            hrefs.push(path);
        }
        site.listing_links.push((PRIMARY_SELECTOR.to_string(), hrefs));
        site
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    /// 各次导航相对 `start` 的时间偏移
    pub fn visit_offsets(&self, start: Instant) -> Vec<(String, Duration)> {
        let urls = self.visited();
        let times = self.visited_at.lock().unwrap().clone();
        urls.into_iter()
            .zip(times)
            .map(|(url, at)| (url, at.duration_since(start)))
            .collect()
    }
}

pub fn game_url(game_id: &str) -> String {
    format!("https://www.sportsline.com/mlb/game-forecast/{}/", game_id)
}

pub fn test_config() -> Config {
    Config {
        listing_url: LISTING_URL.to_string(),
        ..Config::default()
    }
    .without_delays()
}

pub struct FakeLauncher {
    pub site: Arc<FakeSite>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> (Arc<Self>, Arc<FakeSite>) {
        let site = Arc::new(site);
        (
            Arc::new(Self {
                site: Arc::clone(&site),
            }),
            site,
        )
    }
}

#[async_trait]
impl PageLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        self.site.launches.fetch_add(1, Ordering::SeqCst);
        if self.site.fail_launch {
            return Err(anyhow!("Could not find Chrome executable"));
        }
        Ok(Box::new(FakePage {
            site: Arc::clone(&self.site),
            current_url: Mutex::new(String::new()),
        }))
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    current_url: Mutex<String>,
}

impl FakePage {
    fn current_url(&self) -> String {
        self.current_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn configure(&self, _profile: &BrowserProfile) -> Result<()> {
        Ok(())
    }

    async fn goto(&self, url: &str, _wait: WaitUntil, timeout: Duration) -> Result<()> {
        self.site.visited.lock().unwrap().push(url.to_string());
        self.site.visited_at.lock().unwrap().push(Instant::now());
        if url == LISTING_URL {
            if let Some(gate) = &self.site.gate {
                gate.notified().await;
            }
        } else if let Some(FakeGame::NavTimeout) = self.site.games.get(url) {
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: timeout.as_secs(),
            }
            .into());
        }
        *self.current_url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<JsonValue> {
        if script.contains("scrollTo") {
            return Ok(json!(true));
        }

        let url = self.current_url();
        if url == LISTING_URL {
            let hrefs = self
                .site
                .listing_links
                .iter()
                .find(|(selector, _)| script.contains(&serde_json::to_string(selector).unwrap()))
                .map(|(_, hrefs)| hrefs.clone())
                .unwrap_or_default();
            return Ok(json!(hrefs));
        }

        match self.site.games.get(&url) {
            Some(FakeGame::Section {
                percentages,
                records,
                pitchers,
            }) => Ok(json!({
                "found": true,
                "percentages": percentages,
                "records": records,
                "pitchers": pitchers,
            })),
            Some(FakeGame::NoSection) => Ok(json!({ "found": false })),
            Some(FakeGame::EvalError) => Err(anyhow!("Execution context was destroyed")),
            Some(FakeGame::Panic) => panic!("renderer crashed"),
            Some(FakeGame::NavTimeout) | None => Err(anyhow!("no page loaded for {}", url)),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.site.closes.fetch_add(1, Ordering::SeqCst);
        if self.site.fail_close {
            return Err(anyhow!("browser process already exited"));
        }
        Ok(())
    }
}
