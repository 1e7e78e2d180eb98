mod common;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use common::FakeEvidence;
use tech_hunter::server::{analyze_handler, traffic_handler, AppState, UrlQuery};
use tech_hunter::{Config, SiteAnalyzer};

fn state(fake: FakeEvidence) -> AppState {
    AppState::new(SiteAnalyzer::with_provider(Config::default(), Arc::new(fake)))
}

fn query(url: Option<&str>) -> Query<UrlQuery> {
    Query(UrlQuery { url: url.map(str::to_string) })
}

#[tokio::test]
async fn analyze_returns_report_with_traffic() {
    let st = state(FakeEvidence::healthy());
    let axum::Json(body) = analyze_handler(State(st.clone()), query(Some("https://bakery.example/")))
        .await
        .unwrap();
    assert_eq!(body.report.backend.cms, "WordPress");
    assert_eq!(body.traffic.total_visits, 1);

    let v = serde_json::to_value(&body).unwrap();
    assert_eq!(v["url"], "https://bakery.example/");
    assert!(v["backend"].is_object());
    assert_eq!(v["traffic"]["daily_data"].as_array().unwrap().len(), 7);

    let axum::Json(stats) = traffic_handler(State(st), query(Some("https://bakery.example/")))
        .await
        .unwrap();
    assert_eq!(stats.total_visits, 1);
    assert_eq!(stats.highest_daily, 1);
}

#[tokio::test]
async fn missing_and_invalid_urls_are_bad_requests() {
    let st = state(FakeEvidence::healthy());
    let err = analyze_handler(State(st.clone()), query(None)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = analyze_handler(State(st.clone()), query(Some("no-scheme.example"))).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    // Rejected requests are not counted.
    let axum::Json(stats) = traffic_handler(State(st), query(Some("no-scheme.example"))).await.unwrap();
    assert_eq!(stats.total_visits, 0);
}

#[tokio::test]
async fn fetch_failure_is_internal_error_with_explanation() {
    let st = state(FakeEvidence::unreachable("error sending request: operation timed out"));
    let err = analyze_handler(State(st.clone()), query(Some("https://slow.example/")))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message().contains("did not respond in time"));

    // The visit was still recorded.
    let axum::Json(stats) = traffic_handler(State(st), query(Some("https://slow.example/"))).await.unwrap();
    assert_eq!(stats.total_visits, 1);
}
