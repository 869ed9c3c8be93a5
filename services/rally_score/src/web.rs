use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::ServerConfig,
    error::ParseError,
    metrics::MetricsCollector,
    parser::Parser,
    render,
    store::{MatchStore, StoreError},
};

pub const TOKEN_COOKIE: &str = "token";

const ACTION_NEW: &str = "new";
const ACTION_UPDATE: &str = "update";

#[derive(Clone)]
pub struct AppState {
    pub store: MatchStore,
    pub parser: Arc<Parser>,
    pub metrics: MetricsCollector,
    pub config: Arc<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct ApiRequest {
    action: String,
    #[serde(default, rename = "match")]
    match_id: String,
    // Kept as a value so the exact document can be stored once it validates.
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "match")]
    pub match_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing or malformed session token")]
    MissingToken,
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("malformed match id")]
    BadMatchId,
    #[error(transparent)]
    Rejected(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::Database(e)) => {
                error!("Database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// Value of the `token` cookie, if present with the expected length.
fn session_token(headers: &HeaderMap, expected_len: usize) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| value.len() == expected_len)
        .map(str::to_string)
}

fn generate_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub async fn api_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let token = session_token(&headers, state.config.session.token_length)
        .ok_or(ApiError::MissingToken)?;
    let request: ApiRequest = serde_json::from_slice(&body)?;

    match request.action.as_str() {
        ACTION_NEW => {
            let id = state.store.create(&token).await?;
            state.metrics.record_created();
            info!("New match {}", id);
            Ok((StatusCode::CREATED, Json(ApiResponse { match_id: id })).into_response())
        }
        ACTION_UPDATE => {
            let id = Uuid::parse_str(&request.match_id).map_err(|_| ApiError::BadMatchId)?;
            let raw = serde_json::to_string(&request.data)?;

            let validated = match state.parser.parse(&raw) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Rejected update for match {}: {}", id, e);
                    state.metrics.record_rejected(e.to_string());
                    return Err(e.into());
                }
            };

            state.store.update(id, &token, &raw, &validated).await?;
            state.metrics.record_accepted();
            Ok(StatusCode::OK.into_response())
        }
        other => Err(ApiError::UnknownAction(other.to_string())),
    }
}

pub async fn client_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token_length = state.config.session.token_length;
    let mut response = Html(render::CLIENT_PAGE).into_response();

    if session_token(&headers, token_length).is_none() {
        let cookie = format!(
            "{}={}; Path=/; SameSite=Strict",
            TOKEN_COOKIE,
            generate_token(token_length)
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(e) => error!("Could not build session cookie: {}", e),
        }
    }

    response
}

pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let matches = state
        .store
        .recent(state.config.recent_window(), &state.parser)
        .await?;
    Ok(Html(render::matches_page(&matches)))
}

pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_metrics())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/", post(api_handler))
        .route("/c/", get(client_handler))
        .route("/c", get(|| async { Redirect::to("/c/") }))
        .route("/stats", get(stats_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

pub async fn serve(state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&state.config.listen_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
