use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use search_core::corpus::build_from_file;
use search_core::{Document, IndexError, QueryEngine, SearchHit, StandardTokenizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub type Engine = QueryEngine<StandardTokenizer>;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Build the query engine from a corpus file. Malformed lines are skipped and logged.
pub fn load_engine(corpus: &str) -> Result<Arc<Engine>> {
    let tokenizer = StandardTokenizer::new();
    let (index, report) = build_from_file(corpus, &tokenizer)?;
    if !report.skipped.is_empty() {
        tracing::warn!(skipped = report.skipped.len(), "corpus contained malformed records");
    }
    Ok(Arc::new(QueryEngine::new(Arc::new(index), tokenizer)))
}

pub fn build_app(engine: Arc<Engine>) -> Router {
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

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let results = state.engine.search(&params.q).map_err(|e| {
        // postings always reference live documents, so this means a corrupted index
        tracing::error!(error = %e, "search failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<Document>, (StatusCode, String)> {
    match state.engine.index().lookup_document(doc_id) {
        Ok(doc) => Ok(Json(doc.clone())),
        Err(e @ IndexError::OutOfRange { .. }) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
