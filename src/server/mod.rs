//! HTTP front-end: `/analyze`, `/traffic` and `/health`.

pub mod traffic;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::orchestrator::{parse_target, SiteAnalyzer};
use crate::report::AnalysisReport;
use traffic::{TrafficStats, TrafficStore};

pub use traffic::InMemoryTrafficStore;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SiteAnalyzer>,
    pub traffic: Arc<dyn TrafficStore>,
}

impl AppState {
    pub fn new(analyzer: SiteAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            traffic: Arc::new(InMemoryTrafficStore::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", get(analyze_handler))
        .route("/traffic", get(traffic_handler))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub traffic: TrafficStats,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    Query(params): Query<UrlQuery>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let url = required_url(params)?;
    parse_target(&url).map_err(|e| ApiError::BadRequest(e.user_message()))?;

    let today = Utc::now().date_naive();
    state.traffic.record_visit(&url, today);

    info!("Analysis requested: {}", url);
    let report = state.analyzer.analyze(&url).await.map_err(|e| {
        if e.is_client_error() {
            ApiError::BadRequest(e.user_message())
        } else {
            error!("Analysis error for {}: {}", url, e);
            ApiError::InternalError(e.user_message())
        }
    })?;

    Ok(Json(AnalyzeResponse {
        report,
        traffic: state.traffic.stats(&url, today),
    }))
}

pub async fn traffic_handler(
    State(state): State<AppState>,
    Query(params): Query<UrlQuery>,
) -> Result<Json<TrafficStats>, ApiError> {
    let url = required_url(params)?;
    Ok(Json(state.traffic.stats(&url, Utc::now().date_naive())))
}

fn required_url(params: UrlQuery) -> Result<String, ApiError> {
    match params.url.map(|u| u.trim().to_string()) {
        Some(u) if !u.is_empty() => Ok(u),
        _ => {
            warn!("Request without url parameter");
            Err(ApiError::BadRequest("URL parameter is required".to_string()))
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::InternalError(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message()
        }));
        (self.status(), body).into_response()
    }
}
