use std::cmp::Ordering;

use tracing::{debug, info};

use super::domain::{round_tenth, BaseScoreRecord, Candidate, ScoreRequest};
use super::scoring::{ScoreAggregator, ScoringError};

/// Filters the pool to the requested locale, scores each survivor and keeps
/// the strongest few for refinement.
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    aggregator: ScoreAggregator,
    shortlist_size: usize,
}

impl CandidateRanker {
    pub fn new(aggregator: ScoreAggregator) -> Self {
        let shortlist_size = aggregator.config().shortlist_size;
        Self {
            aggregator,
            shortlist_size,
        }
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    pub fn shortlist(
        &self,
        pool: &[Candidate],
        request: &ScoreRequest,
    ) -> Result<Vec<BaseScoreRecord>, ScoringError> {
        let mut records = Vec::new();
        for candidate in pool.iter().filter(|candidate| candidate.serves(&request.city)) {
            let breakdown = self.aggregator.aggregate(candidate, request)?;
            debug!(
                candidate = %candidate.id,
                weighted = breakdown.weighted,
                score = breakdown.score,
                adjustments = breakdown.adjustments.len(),
                "base score computed"
            );
            records.push(BaseScoreRecord {
                candidate: candidate.clone(),
                base_score: round_tenth(breakdown.score),
                components: breakdown.components,
            });
        }

        sort_by_precedence(&mut records);

        info!(
            city = %request.city,
            project_type = %request.project_type,
            matched = records.len(),
            "base scores calculated"
        );
        for (position, record) in records.iter().take(self.shortlist_size).enumerate() {
            info!(
                rank = position + 1,
                name = %record.candidate.name,
                base_score = record.base_score,
                rating = record.candidate.rating,
                reviews = record.candidate.review_count,
                "shortlist entry"
            );
        }

        records.truncate(self.shortlist_size);
        Ok(records)
    }
}

/// Descending on base score, then raw rating, then review count. The sort is
/// stable so full ties keep pool order.
pub fn sort_by_precedence(records: &mut [BaseScoreRecord]) {
    records.sort_by(compare_precedence);
}

fn compare_precedence(a: &BaseScoreRecord, b: &BaseScoreRecord) -> Ordering {
    b.base_score
        .total_cmp(&a.base_score)
        .then_with(|| b.candidate.rating.total_cmp(&a.candidate.rating))
        .then_with(|| b.candidate.review_count.cmp(&a.candidate.review_count))
}
