use std::sync::Arc;
use std::time::Duration;

use contractor_match::matching::{
    seed_candidates, InMemoryCandidateRepository, MatchService, OfflineRefiner, ScoreRequest,
    ScoringConfig, Weights, FALLBACK_RATIONALE,
};

fn request(city: &str, project_type: &str) -> ScoreRequest {
    ScoreRequest {
        city: city.to_string(),
        project_type: project_type.to_string(),
        notes: String::new(),
        weights: Weights::from([
            ("experience", 0.2),
            ("reviews", 0.2),
            ("rating", 0.3),
            ("price", 0.1),
            ("speed", 0.2),
        ]),
    }
}

fn offline_service() -> MatchService<InMemoryCandidateRepository, OfflineRefiner> {
    let repository =
        InMemoryCandidateRepository::new(seed_candidates()).expect("seed ids are unique");
    MatchService::new(
        Arc::new(repository),
        Arc::new(OfflineRefiner),
        ScoringConfig::default(),
        Duration::from_secs(1),
    )
}

#[tokio::test]
async fn unreachable_refiner_still_returns_three_records() {
    let response = offline_service()
        .score(request("Salt Lake City", "roofing"))
        .await
        .expect("scoring succeeds");

    let ids: Vec<_> = response
        .top_contractors
        .iter()
        .map(|record| record.candidate.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c4", "c3"]);
    assert!(response
        .top_contractors
        .iter()
        .all(|record| record.reasoning == FALLBACK_RATIONALE));
}

#[tokio::test]
async fn roofers_lead_the_pack_once_price_matters() {
    let mut request = request("Salt Lake City", "roofing");
    request.weights = Weights::from([
        ("experience", 0.2),
        ("reviews", 0.2),
        ("rating", 0.2),
        ("price", 0.2),
        ("speed", 0.2),
    ]);

    let response = offline_service()
        .score(request)
        .await
        .expect("scoring succeeds");

    let ids: Vec<_> = response
        .top_contractors
        .iter()
        .map(|record| record.candidate.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c4", "c5"]);
}

#[tokio::test]
async fn response_serializes_flat_records() {
    let response = offline_service()
        .score(request("salt lake city", "roofing"))
        .await
        .expect("scoring succeeds");

    let value = serde_json::to_value(&response).expect("serializes");
    let first = &value["top_contractors"][0];
    assert_eq!(first["id"], "c1");
    assert_eq!(first["vertical"], "roofing");
    assert_eq!(first["years_in_business"], 18);
    assert_eq!(first["service_area"], "Salt Lake City");
    assert_eq!(first["speed_weeks"], 2);
    assert_eq!(first["score"], 100.0);
}

#[tokio::test]
async fn unknown_locale_is_not_an_error() {
    let response = offline_service()
        .score(request("Denver", "roofing"))
        .await
        .expect("scoring succeeds");
    assert!(response.top_contractors.is_empty());
}
