//! HTTP 接口
//!
//! 只把 `JobControl` 的四个操作映射成路由，不含业务逻辑。

use crate::error::ScrapeError;
use crate::orchestrator::JobControl;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// 创建路由
pub fn app_router(control: Arc<JobControl>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/scrape", post(start_scrape))
        .route("/api/progress", get(progress))
        .route("/api/download", get(download))
        .route("/api/debug", get(debug))
        .layer(cors)
        .with_state(control)
}

/// 在指定端口启动 HTTP 服务
pub async fn start_server(control: Arc<JobControl>, port: u16) -> anyhow::Result<()> {
    let app = app_router(control);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🚀 MLB Season Splits 服务已启动: http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn start_scrape(State(control): State<Arc<JobControl>>) -> Response {
    match control.start() {
        Ok(_job) => Json(json!({
            "message": "Scraping started",
            "progress": control.progress(),
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn progress(State(control): State<Arc<JobControl>>) -> Response {
    Json(control.progress()).into_response()
}

async fn debug(State(control): State<Arc<JobControl>>) -> Response {
    Json(control.debug()).into_response()
}

async fn download(State(control): State<Arc<JobControl>>) -> Response {
    match control.download() {
        Ok(file) => (
            [
                (header::CONTENT_TYPE, file.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.content,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: ScrapeError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
