//! Serveur HTTP (axum) : page du tableau de bord, API JSON et téléversements

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use swath::Satellite;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::render::render_page;
use crate::report::CoverageReport;
use crate::sources::UploadSlot;
use crate::view::{Dashboard, DashboardView, ViewParams, ViewRequest};

/// État partagé entre les handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Construit le routeur de l'application
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    let body_limit = dashboard.config.max_upload_bytes;

    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/upload/plan/{satellite}", post(upload_plan_handler))
        .route("/upload/aoi/{aoi}", post(upload_aoi_handler))
        .route("/healthz", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { dashboard })
}

/// Lance le serveur jusqu'à Ctrl-C
pub async fn serve(dashboard: Arc<Dashboard>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Serving dashboard on http://{addr}/");

    axum::serve(listener, router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Recalcule la vue hors du runtime async (géométrie coûteuse)
async fn compute_view(state: AppState, params: ViewParams) -> Result<DashboardView> {
    tokio::task::spawn_blocking(move || {
        let dashboard = &state.dashboard;
        let today = Utc::now().date_naive();
        let (request, mut notices) = ViewRequest::from_params(&params, &dashboard.config, today);

        let mut view = dashboard.build_view(request);
        notices.append(&mut view.sidebar);
        view.sidebar = notices;
        view
    })
    .await
    .context("View computation panicked")
}

async fn index_handler(State(state): State<AppState>, Query(params): Query<ViewParams>) -> Response {
    let dashboard = state.dashboard.clone();
    let page = match compute_view(state, params).await {
        Ok(view) => render_page(&dashboard.config, &view),
        Err(e) => Err(e),
    };

    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render dashboard").into_response()
        }
    }
}

async fn view_handler(State(state): State<AppState>, Query(params): Query<ViewParams>) -> Response {
    match compute_view(state, params).await {
        Ok(view) => Json(CoverageReport::from_view(&view)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute view");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to compute view").into_response()
        }
    }
}

async fn upload_plan_handler(
    State(state): State<AppState>,
    Path(satellite): Path<String>,
    body: Bytes,
) -> Response {
    let satellite: Satellite = match satellite.parse() {
        Ok(sat) => sat,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    store(&state, UploadSlot::Plan(satellite), body)
}

async fn upload_aoi_handler(
    State(state): State<AppState>,
    Path(aoi): Path<String>,
    body: Bytes,
) -> Response {
    store(&state, UploadSlot::Aoi(aoi), body)
}

fn store(state: &AppState, slot: UploadSlot, body: Bytes) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty upload").into_response();
    }
    let label = slot.to_string();
    let size = body.len();
    if state.dashboard.store_upload(slot, body) {
        info!(slot = %label, size, "Upload stored");
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::BAD_REQUEST, format!("unknown upload target: {label}")).into_response()
    }
}
