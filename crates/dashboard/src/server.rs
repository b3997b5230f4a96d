use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cropyield_model::{
    render, DashboardContext, InputVector, Observation, ReportView, REPORT_CONTENT_TYPE,
    REPORT_FILENAME,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::page::render_page;

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<DashboardContext>,
    pub start_time: Instant,
    pub req_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(context: Arc<DashboardContext>) -> Self {
        Self {
            context,
            start_time: Instant::now(),
            req_count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn record_request(&self) -> u64 {
        self.req_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// One render pass for the given controls.
    fn render(&self, input: InputVector) -> ReportView {
        let req_total = self.record_request();
        let view = render(&self.context, input);
        debug!(
            req_total,
            rainfall = input.rainfall_mm(),
            temperature = input.temperature_c(),
            soil_nitrogen = input.soil_nitrogen_mgkg(),
            prediction = view.prediction,
            "Rendered prediction"
        );
        view
    }
}

type SharedState = Arc<AppState>;

/// Slider values as submitted by the page form. Missing or empty values use defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ControlQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rainfall: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub soil_nitrogen: Option<f64>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|err| de::Error::custom(format!("{value:?}: {err}"))),
    }
}

impl ControlQuery {
    fn into_input(self) -> InputVector {
        InputVector::from_partial(self.rainfall, self.temperature, self.soil_nitrogen)
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    service: &'static str,
    observations: usize,
    trees: usize,
    uptime_secs: u64,
    req_total: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("invalid control values: {}", rejection.body_text()))
    }
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(Arc::new(state));
    let listener = bind_listener(addr).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("dashboard server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind dashboard listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind dashboard listener on {addr}"))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/report", get(handle_report))
        .route("/api/predict", get(handle_predict))
        .route("/api/dataset", get(handle_dataset))
        .route("/api/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_index(
    State(state): State<SharedState>,
    query: Result<Query<ControlQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(controls) = query?;
    let view = state.render(controls.into_input());
    Ok(Html(render_page(&view, state.context.dataset().observations())))
}

async fn handle_report(
    State(state): State<SharedState>,
    query: Result<Query<ControlQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(controls) = query?;
    let view = state.render(controls.into_input());

    let headers = [
        (
            header::CONTENT_TYPE,
            format!("{REPORT_CONTENT_TYPE}; charset=utf-8"),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{REPORT_FILENAME}\""),
        ),
    ];
    Ok((headers, view.report_text).into_response())
}

async fn handle_predict(
    State(state): State<SharedState>,
    query: Result<Query<ControlQuery>, QueryRejection>,
) -> Result<Json<ReportView>, ApiError> {
    let Query(controls) = query?;
    Ok(Json(state.render(controls.into_input())))
}

async fn handle_dataset(State(state): State<SharedState>) -> Json<Vec<Observation>> {
    Json(state.context.dataset().observations().to_vec())
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "cropyield-dashboard",
        observations: state.context.dataset().len(),
        trees: state.context.model().tree_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        req_total: state.req_count.load(Ordering::Relaxed),
    })
}
