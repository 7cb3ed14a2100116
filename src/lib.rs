//! # MLB Season Splits Scraper
//!
//! 从 SportsLine 的 MLB 赔率页抓取每场比赛的 Season Splits 数据，并导出为 CSV
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - `PageDriver` / `PageLauncher` 抽象，`JsExecutor` 持有 Page
//! - `browser/` - 启动 Chromium，实现页面工厂
//!
//! ### ② 业务能力层（Services）
//! - `record_parser` / `split_schema` - 文本解析与分组目录
//! - `GameUrlExtractor` - 发现比赛链接
//! - `GameSplitsExtractor` - 提取单场比赛的 Season Splits
//! - `table_writer` - 生成 CSV
//!
//! ### ③ 流程层（Workflow）
//! - `GameCtx` - 上下文封装（第几场 + 对阵）
//! - `GameFlow` - 单场流程（导航 → 等待 → 提取 → 补日期）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/scrape_job` - 整个任务的状态流转和进度维护
//! - `orchestrator/job_control` - 单任务互斥、后台启动、下载
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::ChromiumLauncher;
pub use config::Config;
pub use error::{ScrapeError, ScrapeResult};
pub use infrastructure::{JsExecutor, PageDriver, PageLauncher};
pub use models::{GameStatus, GameTask, ProgressHandle, ProgressState, SplitRow, SplitType};
pub use orchestrator::{JobControl, ScrapeOrchestrator};
pub use workflow::{GameCtx, GameFlow, GameResult};
