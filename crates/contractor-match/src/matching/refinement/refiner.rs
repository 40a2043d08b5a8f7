use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::matching::domain::{BaseScoreRecord, ScoreRequest};

/// Everything the refiner needs besides the shortlist itself.
#[derive(Debug, Clone, Serialize)]
pub struct RefinementContext {
    pub request: ScoreRequest,
    /// Maximum distance a refined score may sit from its base score.
    pub adjustment_bound: f64,
    /// Maximum number of candidates the refiner may select.
    pub max_selections: usize,
}

/// Qualitative second opinion on a shortlist.
///
/// Implementations return structured data shaped like
/// `{"top_contractors": [{"id": .., "score": .., "reasoning": ..}]}`; the
/// refinement gate validates and bounds whatever comes back.
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(
        &self,
        shortlist: &[BaseScoreRecord],
        context: &RefinementContext,
    ) -> Result<Value, RefinerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RefinerError {
    #[error("refiner is not configured")]
    NotConfigured,
    #[error("refiner transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("refiner returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("refiner response contained no output text")]
    EmptyOutput,
    #[error("refiner output is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Refiner used when no qualitative backend is available; every call fails,
/// so the gate always serves the base-score fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRefiner;

#[async_trait]
impl Refiner for OfflineRefiner {
    async fn refine(
        &self,
        _shortlist: &[BaseScoreRecord],
        _context: &RefinementContext,
    ) -> Result<Value, RefinerError> {
        Err(RefinerError::NotConfigured)
    }
}
