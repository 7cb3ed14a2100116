//! HTTP 路由测试

mod support;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mlb_splits_scraper::models::ProgressHandle;
use mlb_splits_scraper::orchestrator::{JobControl, ScrapeOrchestrator};
use mlb_splits_scraper::server::app_router;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use support::*;
use tower::ServiceExt;

fn router(site: FakeSite) -> (Router, Arc<JobControl>) {
    let (launcher, _site) = FakeLauncher::new(site);
    let orchestrator = ScrapeOrchestrator::new(test_config(), launcher, ProgressHandle::new());
    let control = Arc::new(JobControl::new(orchestrator));
    (app_router(Arc::clone(&control)), control)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn json(body: &[u8]) -> JsonValue {
    serde_json::from_slice(body).unwrap()
}

async fn wait_until_idle(control: &JobControl) {
    for _ in 0..200 {
        if !control.progress().is_active {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job did not finish");
}

#[tokio::test]
async fn test_progress_when_idle() {
    let (app, _control) = router(FakeSite::new());

    let (status, _, body) = send(&app, "GET", "/api/progress").await;
    assert_eq!(status, StatusCode::OK);

    let body = json(&body);
    assert_eq!(body["isActive"], false);
    assert_eq!(body["progress"], 0.0);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_download_without_data_is_404() {
    let (app, _control) = router(FakeSite::new());

    let (status, _, body) = send(&app, "GET", "/api/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "No data available for download");
}

#[tokio::test]
async fn test_second_scrape_request_conflicts() {
    let (app, control) = router(FakeSite::with_games(vec![(
        "MLB_20250704_BOS@NYY",
        FakeGame::partial(2),
    )]));

    let (status, _, body) = send(&app, "POST", "/api/scrape").await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["message"], "Scraping started");
    assert_eq!(body["progress"]["isActive"], true);

    let (status, _, body) = send(&app, "POST", "/api/scrape").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json(&body)["error"], "Scraping already in progress");

    wait_until_idle(&control).await;
}

#[tokio::test]
async fn test_scrape_then_download_csv() {
    let (app, control) = router(FakeSite::with_games(vec![(
        "MLB_20250704_BOS@NYY",
        FakeGame::full("Brayan Bello", "Carlos Rodon"),
    )]));

    let (status, _, _) = send(&app, "POST", "/api/scrape").await;
    assert_eq!(status, StatusCode::OK);
    wait_until_idle(&control).await;

    let (status, _, body) = send(&app, "GET", "/api/debug").await;
    assert_eq!(status, StatusCode::OK);
    let debug = json(&body);
    assert_eq!(debug["hasData"], true);
    assert_eq!(debug["dataLength"], 10);
    assert_eq!(debug["isActive"], false);

    let (status, headers, body) = send(&app, "GET", "/api/download").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"mlb_season_splits_"));

    let csv = String::from_utf8(body).unwrap();
    assert!(csv.starts_with("Game Date,Split Type,"));
    assert_eq!(csv.lines().count(), 11);
}
