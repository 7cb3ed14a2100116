//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `scrape_job` - 抓取任务编排器
//! - 启动并独占浏览器页面，任务结束时释放
//! - 发现比赛 → 逐场处理 → 汇总数据
//! - 维护进度记录
//!
//! ### `job_control` - 任务控制
//! - 保证同一时间只有一个任务
//! - 在后台启动任务并立即返回
//! - 提供进度快照、CSV 下载和调试信息
//!
//! ## 层次关系
//!
//! ```text
//! job_control (启动 / 查询)
//!     ↓
//! scrape_job (处理 Vec<GameTask>)
//!     ↓
//! workflow::GameFlow (处理单场比赛)
//!     ↓
//! services (能力层：发现链接 / 提取数据 / 生成表格)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod job_control;
pub mod scrape_job;

pub use job_control::{JobControl, JobHandle, TableDownload, CSV_CONTENT_TYPE};
pub use scrape_job::{per_game_progress, JobStats, ScrapeOrchestrator, INITIAL_STEP};
