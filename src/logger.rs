use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化日志
///
/// 默认只输出本 crate 的 info 级别，`verbose` 时改为 debug；设置了 `RUST_LOG` 则以它为准。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mlb_splits_scraper={}", default_level)));

    // 重复初始化（如测试中）时忽略错误
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}
