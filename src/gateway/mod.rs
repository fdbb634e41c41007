//! HTTP gateway (Axum) for answer evaluation.
//!
//! Routes:
//!
//! - `GET /` and `GET /health`: liveness plus which artifacts loaded
//! - `POST /evaluate-answer`: score an answer
//!
//! Every `/evaluate-answer` response carries an [`SCORER_STATUS_HEADER`] saying how
//! the result was produced (`ok`, `too_short`, `fallback`) or why it was rejected
//! (`invalid_request`, `model_unavailable`).

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, header, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::evaluate_answer_handler;
pub use payload::{ErrorResponse, EvaluateRequest, HealthResponse, IndexResponse};
pub use state::{ArtifactStatus, HandlerState};

use crate::model::{Classifier, Vectorizer};

pub const SCORER_STATUS_HEADER: &str = "X-Scorer-Status";
pub const SCORER_STATUS_HEALTHY: &str = "healthy";
pub const SCORER_STATUS_DEGRADED: &str = "degraded";

pub const INDEX_MESSAGE: &str = "AI Mock Interview Backend API";

pub fn create_router_with_state<V, C>(state: HandlerState<V, C>) -> Router
where
    V: Vectorizer + 'static,
    C: Classifier + 'static,
{
    Router::new()
        .route("/", get(index_handler::<V, C>))
        .route("/health", get(health_handler::<V, C>))
        .route("/evaluate-answer", post(evaluate_answer_handler::<V, C>))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin may call the API from a browser.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE])
}

fn status_headers(artifacts: ArtifactStatus) -> HeaderMap {
    let status = if artifacts.vectorizer_loaded && artifacts.model_loaded {
        SCORER_STATUS_HEALTHY
    } else {
        SCORER_STATUS_DEGRADED
    };
    let mut headers = HeaderMap::new();
    headers.insert(SCORER_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[tracing::instrument(skip_all)]
pub async fn index_handler<V, C>(State(state): State<HandlerState<V, C>>) -> Response
where
    V: Vectorizer + 'static,
    C: Classifier + 'static,
{
    (
        StatusCode::OK,
        status_headers(state.artifacts),
        Json(IndexResponse {
            status: "running".to_string(),
            message: INDEX_MESSAGE.to_string(),
            model_loaded: state.artifacts.model_loaded,
            vectorizer_loaded: state.artifacts.vectorizer_loaded,
        }),
    )
        .into_response()
}

/// Always 200 while the process is up, even with no artifacts loaded.
#[tracing::instrument(skip_all)]
pub async fn health_handler<V, C>(State(state): State<HandlerState<V, C>>) -> Response
where
    V: Vectorizer + 'static,
    C: Classifier + 'static,
{
    (
        StatusCode::OK,
        status_headers(state.artifacts),
        Json(HealthResponse {
            status: "healthy".to_string(),
            model_loaded: state.artifacts.model_loaded,
            vectorizer_loaded: state.artifacts.vectorizer_loaded,
        }),
    )
        .into_response()
}
