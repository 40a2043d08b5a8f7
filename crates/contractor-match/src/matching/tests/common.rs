use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::matching::domain::{
    BaseScoreRecord, Candidate, CandidateId, NormalizedComponents, PriceTier, ScoreRequest,
    Weights,
};
use crate::matching::refinement::{
    GateConfig, RefinementContext, RefinementGate, Refiner, RefinerError,
};
use crate::matching::repository::{
    CandidateRepository, InMemoryCandidateRepository, RepositoryError,
};
use crate::matching::scoring::{ScoreAggregator, ScoringConfig};
use crate::matching::{seed_candidates, CandidateRanker, MatchService};

pub(super) fn roofing_weights() -> Weights {
    Weights::from([
        ("experience", 0.2),
        ("reviews", 0.2),
        ("rating", 0.3),
        ("price", 0.1),
        ("speed", 0.2),
    ])
}

pub(super) fn roofing_request() -> ScoreRequest {
    ScoreRequest {
        city: "Salt Lake City".to_string(),
        project_type: "roofing".to_string(),
        notes: "Need a full tear-off before winter".to_string(),
        weights: roofing_weights(),
    }
}

pub(super) fn candidate(id: &str) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: format!("Contractor {id}"),
        vertical: "roofing".to_string(),
        years_in_business: 10,
        rating: 4.5,
        review_count: 100,
        service_area: "Salt Lake City".to_string(),
        pricing_band: PriceTier::Standard,
        speed_weeks: 3,
        licenses: vec![format!("UT-ROOF-{id}")],
        flags: BTreeSet::new(),
    }
}

pub(super) fn seeded(id: &str) -> Candidate {
    seed_candidates()
        .into_iter()
        .find(|candidate| candidate.id.as_str() == id)
        .expect("seed candidate present")
}

pub(super) fn record(id: &str, base_score: f64) -> BaseScoreRecord {
    BaseScoreRecord {
        candidate: candidate(id),
        base_score,
        components: NormalizedComponents::default(),
    }
}

pub(super) fn aggregator() -> ScoreAggregator {
    ScoreAggregator::new(ScoringConfig::default())
}

pub(super) fn ranker() -> CandidateRanker {
    CandidateRanker::new(aggregator())
}

pub(super) fn gate_config() -> GateConfig {
    GateConfig::from_scoring(&ScoringConfig::default(), Duration::from_millis(200))
}

pub(super) fn gate<F: Refiner>(refiner: F) -> RefinementGate<F> {
    RefinementGate::new(Arc::new(refiner), gate_config())
}

/// Refiner double that replays a canned reply and records what it was shown.
#[derive(Default)]
pub(super) struct ScriptedRefiner {
    reply: Option<Value>,
    calls: Mutex<Vec<(Vec<CandidateId>, RefinementContext)>>,
}

impl ScriptedRefiner {
    pub(super) fn replying(reply: Value) -> Self {
        Self {
            reply: Some(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn calls(&self) -> Vec<(Vec<CandidateId>, RefinementContext)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl Refiner for ScriptedRefiner {
    async fn refine(
        &self,
        shortlist: &[BaseScoreRecord],
        context: &RefinementContext,
    ) -> Result<Value, RefinerError> {
        self.calls.lock().expect("calls mutex poisoned").push((
            shortlist
                .iter()
                .map(|record| record.candidate.id.clone())
                .collect(),
            context.clone(),
        ));
        self.reply.clone().ok_or(RefinerError::EmptyOutput)
    }
}

/// Refiner that never answers within the gate's deadline.
pub(super) struct StalledRefiner;

#[async_trait]
impl Refiner for StalledRefiner {
    async fn refine(
        &self,
        _shortlist: &[BaseScoreRecord],
        _context: &RefinementContext,
    ) -> Result<Value, RefinerError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(serde_json::json!({ "top_contractors": [] }))
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn list_by_locale(&self, _locale: &str) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn seeded_repository() -> Arc<InMemoryCandidateRepository> {
    Arc::new(InMemoryCandidateRepository::new(seed_candidates()).expect("seed ids are unique"))
}

pub(super) fn build_service<F: Refiner + 'static>(
    refiner: Arc<F>,
) -> MatchService<InMemoryCandidateRepository, F> {
    MatchService::new(
        seeded_repository(),
        refiner,
        ScoringConfig::default(),
        Duration::from_millis(200),
    )
}

pub(super) fn ids(records: &[impl AsRef<Candidate>]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.as_ref().id.as_str())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
