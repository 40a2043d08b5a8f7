//! Contractor matching: normalization, weighted scoring, shortlist ranking and
//! bounded refinement of the final top list.

pub mod catalog;
pub mod domain;
pub mod normalize;
pub mod ranker;
pub mod refinement;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{seed_candidates, CandidateCsvImporter, CatalogImportError};
pub use domain::{
    Attribute, BaseScoreRecord, Candidate, CandidateId, FinalScoreRecord, NormalizedComponents,
    PriceTier, ScoreRequest, ScoreResponse, Weights,
};
pub use ranker::CandidateRanker;
pub use refinement::{
    clamp_adjustment, GateConfig, OfflineRefiner, OpenAiRefiner, RefinementContext,
    RefinementGate, RefinementOutcome, Refiner, RefinerError, FALLBACK_RATIONALE,
};
pub use repository::{CandidateRepository, InMemoryCandidateRepository, RepositoryError};
pub use router::match_router;
pub use scoring::{ScoreAggregator, ScoreBreakdown, ScoringConfig, ScoringError};
pub use service::{MatchService, MatchServiceError};
