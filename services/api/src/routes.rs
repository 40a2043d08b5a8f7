use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use contractor_match::matching::{match_router, CandidateRepository, MatchService, Refiner};
use serde_json::json;
use std::sync::Arc;

pub(crate) const SERVICE_NAME: &str = "Home Repair Contractor Matcher API";
pub(crate) const SERVICE_VERSION: &str = "1.0.0";

pub(crate) fn with_match_routes<R, F>(service: Arc<MatchService<R, F>>) -> axum::Router
where
    R: CandidateRepository + 'static,
    F: Refiner + ?Sized + 'static,
{
    match_router(service)
        .route("/", axum::routing::get(root_endpoint))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "message": SERVICE_NAME, "version": SERVICE_VERSION }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use contractor_match::matching::{
        seed_candidates, InMemoryCandidateRepository, OfflineRefiner, ScoringConfig,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let repository =
            InMemoryCandidateRepository::new(seed_candidates()).expect("seed ids are unique");
        let refiner: Arc<dyn Refiner> = Arc::new(OfflineRefiner);
        let service = MatchService::new(
            Arc::new(repository),
            refiner,
            ScoringConfig::default(),
            Duration::from_millis(50),
        );
        with_match_routes(Arc::new(service))
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = get_json(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn root_reports_service_identity() {
        let (status, body) = get_json(router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], SERVICE_NAME);
        assert_eq!(body["version"], SERVICE_VERSION);
    }

    #[tokio::test]
    async fn score_route_is_mounted() {
        let response = router()
            .oneshot(
                Request::post("/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"city":"Salt Lake City","project_type":"roofing","notes":"","weights":{"rating":1.0}}"#,
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
