//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use super::models::{AskRequest, ErrorResponse, LearnRequest, RandomTopicResponse};
use crate::answer::ContextAnswerer;
use crate::catalog::Catalog;
use crate::plan::PlanAssembler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assembler: Option<Arc<PlanAssembler>>,
    pub answerer: Arc<ContextAnswerer>,
    pub catalog: Option<Arc<dyn Catalog>>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    assembler: Option<Arc<PlanAssembler>>,
    answerer: Arc<ContextAnswerer>,
    catalog: Option<Arc<dyn Catalog>>,
    port: u16,
) -> Result<()> {
    info!("Starting HTTP server on port {}", port);

    let app_state = AppState {
        assembler,
        answerer,
        catalog,
    };

    // Allow browser access from the web front end.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/learn", post(learn_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/random", get(random_handler))
        .route("/api/playlists/:id/items", get(playlist_items_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check().await))
}

/// Plan generation handler. Failures surface with the status the error
/// taxonomy defines (400 invalid topic, 404 nothing found, 500 otherwise).
async fn learn_handler(
    State(state): State<AppState>,
    Json(request): Json<LearnRequest>,
) -> impl IntoResponse {
    match handlers::generate_plan(&state.assembler, request).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Question handler. Always 200; the answer text carries any degradation.
async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(handlers::ask(&state.answerer, request).await),
    )
}

/// Playlist items handler
async fn playlist_items_handler(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<String>,
) -> impl IntoResponse {
    match handlers::playlist_items(&state.catalog, &id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Random topic handler
async fn random_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(RandomTopicResponse {
            topic: handlers::random_topic().to_string(),
        }),
    )
}
