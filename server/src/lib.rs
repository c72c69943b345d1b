use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use epistula_core::library::LibraryIndex;
use epistula_core::persist::{load_full, load_library, load_light, IndexPaths};
use epistula_core::search::{search, Pagination, ResultView, ScoringWeights};
use epistula_core::{DocNumber, FullIndex};
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const CACHE_CONTROL: &str = "public, max-age=3600";

/// Pagination values stay raw strings so bad input can fall back to defaults.
#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Artifacts loaded from one build. Never mutated; reloads replace it whole.
///
/// The light and library indexes are only ever sent as-is, so they are kept
/// serialized.
pub struct Snapshot {
    pub full: FullIndex,
    pub light: Bytes,
    pub library: Option<Bytes>,
}

impl Snapshot {
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let full = load_full(paths)?;
        let light = Bytes::from(serde_json::to_vec(&load_light(paths)?)?);
        let library = load_library(paths)?.map(|l: LibraryIndex| serde_json::to_vec(&l)).transpose()?.map(Bytes::from);
        Ok(Self { full, light, library })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub index_paths_root: PathBuf,
    pub snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pub weights: ScoringWeights,
    pub admin_token: Option<String>,
}

impl AppState {
    /// The snapshot current at call time; a concurrent reload does not affect it.
    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }
}

pub fn build_app(index_dir: String, weights: ScoringWeights) -> Result<Router> {
    let index_paths = IndexPaths::new(&index_dir);
    let snapshot = Snapshot::load(&index_paths)?;
    tracing::info!(num_docs = snapshot.full.documents.len(), num_terms = snapshot.full.index.len(), "loaded artifacts");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState {
        index_paths_root: PathBuf::from(&index_dir),
        snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        weights,
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/letters/:number", get(letter_handler))
        .route("/light-index", get(light_index_handler))
        .route("/enhanced-index", get(enhanced_index_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> impl IntoResponse {
    let page = Pagination::from_raw(params.limit.as_deref(), params.offset.as_deref());
    let snapshot = state.current();
    let result = search(params.q.as_deref().unwrap_or(""), &snapshot.full, page, &state.weights);
    ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(result))
}

pub async fn letter_handler(
    State(state): State<AppState>,
    number: Result<Path<DocNumber>, PathRejection>,
) -> Result<Json<ResultView>, (StatusCode, Json<serde_json::Value>)> {
    let Path(number) = number.map_err(|e| json_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
    let snapshot = state.current();
    match snapshot.full.record(number) {
        Some(record) => Ok(Json(ResultView::from(record))),
        None => Err(not_found()),
    }
}

fn json_bytes(bytes: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json"), (header::CACHE_CONTROL, CACHE_CONTROL)], bytes)
}

pub async fn light_index_handler(State(state): State<AppState>) -> impl IntoResponse {
    json_bytes(state.current().light.clone())
}

pub async fn enhanced_index_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let library = state.current().library.clone().ok_or_else(not_found)?;
    Ok(json_bytes(library))
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let paths = IndexPaths::new(&state.index_paths_root);
    let fresh = Snapshot::load(&paths).map_err(|e| {
        tracing::error!(error = %e, "reload failed, keeping current artifacts");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("reload failed: {e:#}"))
    })?;
    let body = serde_json::json!({ "num_docs": fresh.full.documents.len(), "num_terms": fresh.full.index.len() });
    *state.snapshot.write() = Arc::new(fresh);
    tracing::info!(%body, "artifacts reloaded");
    Ok(Json(body))
}

fn json_error(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    json_error(StatusCode::NOT_FOUND, "not found")
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
