//! Bounded qualitative refinement of a base-score shortlist.
//!
//! The refiner is untrusted: its scores are clamped to the configured bound
//! around the shortlist's own base scores, identifiers it invents are dropped,
//! and candidate attributes always come from the shortlist. Any failure to
//! reach the refiner or to read its output falls back to the base scores.

mod openai;
mod prompt;
mod refiner;

pub use openai::OpenAiRefiner;
pub use refiner::{OfflineRefiner, RefinementContext, Refiner, RefinerError};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::domain::{round_tenth, BaseScoreRecord, CandidateId, FinalScoreRecord, ScoreRequest};
use super::scoring::ScoringConfig;

pub const FALLBACK_RATIONALE: &str = "Base score (GPT adjustment failed)";

/// Limits the gate enforces on refiner output.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub adjustment_bound: f64,
    pub final_size: usize,
    pub score_cap: f64,
    pub timeout: Duration,
}

impl GateConfig {
    pub fn from_scoring(config: &ScoringConfig, timeout: Duration) -> Self {
        Self {
            adjustment_bound: config.adjustment_bound,
            final_size: config.final_size,
            score_cap: config.score_cap,
            timeout,
        }
    }
}

/// Result of a refinement pass, recording whether the refiner's output was used.
#[derive(Debug, Clone, PartialEq)]
pub enum RefinementOutcome {
    Refined(Vec<FinalScoreRecord>),
    Fallback(Vec<FinalScoreRecord>),
}

impl RefinementOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RefinementOutcome::Fallback(_))
    }

    pub fn into_records(self) -> Vec<FinalScoreRecord> {
        match self {
            RefinementOutcome::Refined(records) | RefinementOutcome::Fallback(records) => records,
        }
    }
}

pub struct RefinementGate<F: ?Sized> {
    refiner: Arc<F>,
    config: GateConfig,
}

impl<F> RefinementGate<F>
where
    F: Refiner + ?Sized,
{
    pub fn new(refiner: Arc<F>, config: GateConfig) -> Self {
        Self { refiner, config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub async fn refine(
        &self,
        request: &ScoreRequest,
        shortlist: &[BaseScoreRecord],
    ) -> RefinementOutcome {
        if shortlist.is_empty() {
            return RefinementOutcome::Refined(Vec::new());
        }

        let context = RefinementContext {
            request: request.clone(),
            adjustment_bound: self.config.adjustment_bound,
            max_selections: self.config.final_size,
        };

        let reply = tokio::time::timeout(
            self.config.timeout,
            self.refiner.refine(shortlist, &context),
        )
        .await;

        let value = match reply {
            Ok(Ok(value)) => value,
            Ok(Err(RefinerError::NotConfigured)) => {
                info!("refiner not configured; serving base scores");
                return RefinementOutcome::Fallback(self.fallback(shortlist));
            }
            Ok(Err(err)) => {
                error!(error = %err, "refiner unavailable; serving base scores");
                return RefinementOutcome::Fallback(self.fallback(shortlist));
            }
            Err(_) => {
                error!(
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "refiner timed out; serving base scores"
                );
                return RefinementOutcome::Fallback(self.fallback(shortlist));
            }
        };

        match self.apply(shortlist, value) {
            Ok(records) => RefinementOutcome::Refined(records),
            Err(err) => {
                error!(error = %err, "refiner output malformed; serving base scores");
                RefinementOutcome::Fallback(self.fallback(shortlist))
            }
        }
    }

    /// Validates refiner output against the shortlist it was given.
    pub fn apply(
        &self,
        shortlist: &[BaseScoreRecord],
        value: Value,
    ) -> Result<Vec<FinalScoreRecord>, serde_json::Error> {
        let reply: RefinedShortlist = serde_json::from_value(value)?;
        let lookup: HashMap<&CandidateId, &BaseScoreRecord> = shortlist
            .iter()
            .map(|record| (&record.candidate.id, record))
            .collect();

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for entry in reply.top_contractors {
            let Some(record) = lookup.get(&entry.id) else {
                warn!(candidate = %entry.id, "refiner returned candidate outside the shortlist");
                continue;
            };
            if !seen.insert(&record.candidate.id) {
                warn!(candidate = %entry.id, "refiner repeated a candidate");
                continue;
            }

            let base = record.base_score;
            let bounded = clamp_adjustment(base, entry.score, self.config.adjustment_bound);
            if bounded != entry.score {
                warn!(
                    candidate = %entry.id,
                    suggested = entry.score,
                    clamped = bounded,
                    base,
                    "refiner score outside adjustment bound"
                );
            }

            let score = round_tenth(bounded.clamp(0.0, self.config.score_cap));
            info!(
                name = %record.candidate.name,
                base,
                score,
                delta = %format!("{:+.1}", score - base),
                "final score"
            );

            records.push(FinalScoreRecord {
                candidate: record.candidate.clone(),
                score,
                reasoning: entry.reasoning.unwrap_or_default(),
            });
        }

        records.truncate(self.config.final_size);
        Ok(records)
    }

    /// Top of the shortlist at base score, used whenever refinement is unusable.
    pub fn fallback(&self, shortlist: &[BaseScoreRecord]) -> Vec<FinalScoreRecord> {
        shortlist
            .iter()
            .take(self.config.final_size)
            .map(|record| FinalScoreRecord {
                candidate: record.candidate.clone(),
                score: record.base_score,
                reasoning: FALLBACK_RATIONALE.to_string(),
            })
            .collect()
    }
}

/// Hard floor and ceiling around `base`: `max(base - bound, min(suggested, base + bound))`.
pub fn clamp_adjustment(base: f64, suggested: f64, bound: f64) -> f64 {
    (base - bound).max(suggested.min(base + bound))
}

#[derive(Debug, Deserialize)]
struct RefinedShortlist {
    top_contractors: Vec<RefinedEntry>,
}

/// Only the identifier, score and rationale are read; echoed attributes are ignored.
#[derive(Debug, Deserialize)]
struct RefinedEntry {
    id: CandidateId,
    score: f64,
    #[serde(default)]
    reasoning: Option<String>,
}
