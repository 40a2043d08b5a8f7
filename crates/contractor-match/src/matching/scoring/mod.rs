mod config;
mod rules;

pub use config::ScoringConfig;

use super::domain::{Attribute, Candidate, CandidateId, NormalizedComponents, ScoreRequest};
use super::normalize::{
    normalize_experience, normalize_price, normalize_rating, normalize_reviews, normalize_speed,
};
use serde::Serialize;

/// Stateless aggregator that applies the scoring tables to one candidate.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn normalize(&self, candidate: &Candidate, request: &ScoreRequest) -> NormalizedComponents {
        let price_weight = request
            .weights
            .price_emphasis(self.config.pricing.default_weight);

        NormalizedComponents {
            experience: normalize_experience(candidate.years_in_business),
            reviews: normalize_reviews(candidate.review_count),
            rating: normalize_rating(candidate.rating),
            price: normalize_price(candidate.pricing_band, price_weight, &self.config.pricing),
            speed: normalize_speed(candidate.speed_weeks),
        }
    }

    /// Weighted sum, then category multiplier, then flag penalties, then the cap.
    pub fn aggregate(
        &self,
        candidate: &Candidate,
        request: &ScoreRequest,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let components = self.normalize(candidate, request);

        let weighted: f64 = Attribute::ALL
            .iter()
            .map(|attribute| components.value(*attribute) * request.weights.get(*attribute))
            .sum();

        let mut adjustments = Vec::new();
        if let Some(adjustment) =
            rules::category_adjustment(candidate, &request.project_type, &self.config)
        {
            adjustments.push(adjustment);
        }
        adjustments.extend(rules::flag_adjustments(candidate, &self.config));

        let adjusted = adjustments
            .iter()
            .fold(weighted, |score, adjustment| score * adjustment.factor);

        if !adjusted.is_finite() {
            return Err(ScoringError::NonFinite {
                candidate: candidate.id.clone(),
                value: adjusted,
            });
        }

        Ok(ScoreBreakdown {
            score: adjusted.min(self.config.score_cap),
            weighted,
            components,
            adjustments,
        })
    }
}

/// Multiplier applied after weighting, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub kind: AdjustmentKind,
    pub factor: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    SpecialistMatch,
    GeneralistPenalty,
    NegativeFlag(String),
}

/// Aggregator output: the capped score plus the trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub weighted: f64,
    pub components: NormalizedComponents,
    pub adjustments: Vec<ScoreAdjustment>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("score for candidate {candidate} is not a finite number ({value})")]
    NonFinite { candidate: CandidateId, value: f64 },
}
