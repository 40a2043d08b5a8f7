use std::sync::Arc;

use tracing::info;

use super::domain::{ScoreRequest, ScoreResponse};
use super::ranker::CandidateRanker;
use super::refinement::{GateConfig, RefinementGate, Refiner};
use super::repository::{CandidateRepository, RepositoryError};
use super::scoring::{ScoreAggregator, ScoringConfig, ScoringError};

/// Service composing the candidate source, the ranker and the refinement gate.
pub struct MatchService<R, F: ?Sized> {
    repository: Arc<R>,
    ranker: CandidateRanker,
    gate: RefinementGate<F>,
}

impl<R, F> MatchService<R, F>
where
    R: CandidateRepository + 'static,
    F: Refiner + ?Sized + 'static,
{
    pub fn new(
        repository: Arc<R>,
        refiner: Arc<F>,
        config: ScoringConfig,
        refiner_timeout: std::time::Duration,
    ) -> Self {
        let gate = RefinementGate::new(refiner, GateConfig::from_scoring(&config, refiner_timeout));
        let ranker = CandidateRanker::new(ScoreAggregator::new(config));

        Self {
            repository,
            ranker,
            gate,
        }
    }

    pub fn ranker(&self) -> &CandidateRanker {
        &self.ranker
    }

    /// Score the locale's candidates and return the refined top list.
    pub async fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, MatchServiceError> {
        info!(
            project_type = %request.project_type,
            city = %request.city,
            "scoring contractors"
        );

        let pool = self.repository.list_by_locale(&request.city)?;
        let shortlist = self.ranker.shortlist(&pool, &request)?;
        let outcome = self.gate.refine(&request, &shortlist).await;

        if outcome.is_fallback() {
            info!(shortlisted = shortlist.len(), "returning unadjusted base scores");
        }

        Ok(ScoreResponse {
            top_contractors: outcome.into_records(),
        })
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
