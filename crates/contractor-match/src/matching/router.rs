use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ScoreRequest;
use super::refinement::Refiner;
use super::repository::CandidateRepository;
use super::service::MatchService;

/// Router builder exposing the scoring endpoint.
pub fn match_router<R, F>(service: Arc<MatchService<R, F>>) -> Router
where
    R: CandidateRepository + 'static,
    F: Refiner + ?Sized + 'static,
{
    Router::new()
        .route("/score", post(score_handler::<R, F>))
        .with_state(service)
}

pub(crate) async fn score_handler<R, F>(
    State(service): State<Arc<MatchService<R, F>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    F: Refiner + ?Sized + 'static,
{
    match service.score(request).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => {
            error!(error = %err, "error scoring contractors");
            let payload = json!({
                "error": format!("Failed to score contractors: {err}"),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
